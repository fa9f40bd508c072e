//! BN254 arithmetic used by the verifiers.
//!
//! Points and field elements arriving from outside (calldata words, JSON coordinates)
//! enter through the constructors in this module, which reject non-canonical integers
//! and points off the curve. Everything past this boundary works on typed arkworks
//! values.

use alloy_primitives::U256;
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::{
    AffineRepr,
    pairing::{Pairing, PairingOutput},
    short_weierstrass::{Affine, SWCurveConfig},
};
use ark_ff::{AdditiveGroup, BitIteratorBE, PrimeField, Zero};

use crate::{VerificationError, VerificationResult};

/// Converts a 256-bit word into a scalar, rejecting values `>= r`.
pub fn fr_from_u256(value: U256) -> VerificationResult<Fr> {
    Fr::try_from(value)
        .map_err(|_| VerificationError::MalformedInput(format!("scalar {value} is not below r")))
}

/// Converts a 256-bit word into a base field element, rejecting values `>= q`.
pub fn fq_from_u256(value: U256) -> VerificationResult<Fq> {
    Fq::try_from(value)
        .map_err(|_| VerificationError::MalformedInput(format!("coordinate {value} is not below q")))
}

/// Returns the canonical integer representative of a field element.
pub fn to_u256<F: Copy>(f: &F) -> U256
where
    U256: From<F>,
{
    <U256 as From<F>>::from(*f)
}

/// Builds a G1 point from affine coordinates. `(0, 0)` encodes the identity, as for the
/// EVM precompiles.
pub fn g1_from_coordinates(x: U256, y: U256) -> VerificationResult<G1Affine> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::zero());
    }
    let p = G1Affine::new_unchecked(fq_from_u256(x)?, fq_from_u256(y)?);
    ensure_g1(&p)?;
    Ok(p)
}

/// Builds a G2 point from affine coordinates given as `(c0, c1)` pairs. All zeros encode
/// the identity.
pub fn g2_from_coordinates(
    x_c0: U256,
    x_c1: U256,
    y_c0: U256,
    y_c1: U256,
) -> VerificationResult<G2Affine> {
    if [x_c0, x_c1, y_c0, y_c1].iter().all(U256::is_zero) {
        return Ok(G2Affine::zero());
    }
    let x = Fq2::new(fq_from_u256(x_c0)?, fq_from_u256(x_c1)?);
    let y = Fq2::new(fq_from_u256(y_c0)?, fq_from_u256(y_c1)?);
    let p = G2Affine::new_unchecked(x, y);
    ensure_g2(&p)?;
    Ok(p)
}

fn ensure_point<P: SWCurveConfig>(p: &Affine<P>, group: &str) -> VerificationResult<()> {
    ark_serde_compat::check_point(*p)
        .map(|_| ())
        .map_err(|err| VerificationError::MalformedInput(format!("{group} point: {err}")))
}

/// Checks that a G1 point is the identity or lies on the curve.
pub fn ensure_g1(p: &G1Affine) -> VerificationResult<()> {
    ensure_point(p, "G1")
}

/// Checks that a G2 point is the identity or lies on the twist in the prime-order
/// subgroup.
pub fn ensure_g2(p: &G2Affine) -> VerificationResult<()> {
    ensure_point(p, "G2")
}

/// Double-and-add scalar multiplication, scanning the bits of `s` from the most
/// significant one.
pub fn scalar_mul<G: AffineRepr>(p: &G, s: &G::ScalarField) -> G::Group {
    let base = p.into_group();
    let mut acc = G::zero().into_group();
    for bit in BitIteratorBE::without_leading_zeros(s.into_bigint()) {
        acc.double_in_place();
        if bit {
            acc += base;
        }
    }
    acc
}

/// Computes `Σ sᵢ·Pᵢ`.
pub fn linear_combination<G: AffineRepr>(
    points: &[G],
    scalars: &[G::ScalarField],
) -> VerificationResult<G::Group> {
    if points.len() != scalars.len() {
        return Err(VerificationError::MalformedInput(format!(
            "{} points but {} scalars",
            points.len(),
            scalars.len()
        )));
    }
    Ok(points
        .iter()
        .zip(scalars)
        .fold(G::zero().into_group(), |acc, (p, s)| acc + scalar_mul(p, s)))
}

/// The optimal ate pairing `e(P, Q)`.
pub fn pairing(p: G1Affine, q: G2Affine) -> PairingOutput<Bn254> {
    Bn254::pairing(p, q)
}

/// Checks `Π e(Pᵢ, Qᵢ) = 1` with one multi-Miller loop and a single final
/// exponentiation. Pairs with an identity operand contribute the neutral element.
pub fn pairing_product_is_one(pairs: &[(G1Affine, G2Affine)]) -> bool {
    let (g1, g2): (Vec<_>, Vec<_>) = pairs.iter().copied().unzip();
    Bn254::multi_pairing(g1, g2).is_zero()
}
