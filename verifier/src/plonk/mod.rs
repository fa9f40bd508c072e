//! The snarkjs PLONK verifier (KZG commitments, Keccak-256 transcript).
//!
//! This is the computation performed by `verifyProof` of the `PlonkVerifier.sol`
//! contract snarkjs exports, on typed values instead of calldata:
//!
//! 1. replay the transcript to obtain β, γ, α, ξ, v and u,
//! 2. evaluate the vanishing polynomial, the Lagrange polynomials and the public input
//!    polynomial at ξ,
//! 3. build the linearisation commitment `D` and the batched commitment `F`,
//! 4. check both KZG openings with a single pairing product.

use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{FftField, Field};
use circom_types::plonk::{PlonkProof, VerificationKey};

use crate::{
    VerificationError, VerificationResult,
    curve::{ensure_g1, ensure_g2, linear_combination, pairing_product_is_one, scalar_mul},
};

mod transcript;
#[cfg(test)]
pub(crate) mod test_prover;

pub use transcript::{Challenges, Transcript};

/// Evaluations at ξ shared between the scalar and group parts of the check.
struct PointEvaluations {
    /// ξⁿ
    xin: Fr,
    /// Z_H(ξ) = ξⁿ − 1
    zh: Fr,
    /// L₁(ξ)
    l1: Fr,
    /// PI(ξ) = −Σ xᵢ·Lᵢ(ξ)
    pi: Fr,
}

/// Checks the domain parameters and re-validates the key's points.
pub fn validate_key(vk: &VerificationKey) -> VerificationResult<()> {
    let n = vk.domain_size().ok_or_else(|| {
        VerificationError::MalformedInput(format!(
            "power {} exceeds the two-adicity {} of Fr",
            vk.power,
            Fr::TWO_ADICITY
        ))
    })?;
    if vk.w.pow([n as u64]) != Fr::ONE {
        return Err(VerificationError::MalformedInput(format!(
            "w is not a {n}-th root of unity"
        )));
    }
    // primitive: w^(n/2) must be -1, which for n = 1 means w = 1
    if n > 1 && vk.w.pow([(n / 2) as u64]) == Fr::ONE {
        return Err(VerificationError::MalformedInput(format!(
            "w is not a primitive {n}-th root of unity"
        )));
    }
    for p in [
        &vk.qm, &vk.ql, &vk.qr, &vk.qo, &vk.qc, &vk.s1, &vk.s2, &vk.s3,
    ] {
        ensure_g1(p)?;
    }
    ensure_g2(&vk.x_2)
}

fn check_public_input_length(vk: &VerificationKey, public_inputs: &[Fr]) -> VerificationResult<()> {
    if public_inputs.len() != vk.n_public {
        return Err(VerificationError::InvalidPublicInputLength {
            expected: vk.n_public,
            actual: public_inputs.len(),
        });
    }
    Ok(())
}

/// Replays the Fiat-Shamir transcript of `proof`.
pub fn compute_challenges(
    vk: &VerificationKey,
    proof: &PlonkProof,
    public_inputs: &[Fr],
) -> VerificationResult<Challenges> {
    let mut transcript = Transcript::new();
    let (beta, gamma) = transcript.beta_gamma(vk, public_inputs, [&proof.a, &proof.b, &proof.c])?;
    let alpha = transcript.alpha(&proof.z)?;
    let xi = transcript.xi([&proof.t1, &proof.t2, &proof.t3])?;
    let v = transcript.v(&proof.evaluations())?;
    let u = transcript.u(&proof.wxi, &proof.wxiw)?;
    let challenges = Challenges {
        beta,
        gamma,
        alpha,
        xi,
        v,
        u,
    };
    tracing::debug!(?challenges, "replayed transcript");
    Ok(challenges)
}

/// Evaluates `ξⁿ`, `Z_H(ξ)`, `L₁(ξ)` and `PI(ξ)`. Returns `None` if ξ lies in the
/// evaluation domain, where the Lagrange formula divides by zero.
fn evaluate_at_xi(
    vk: &VerificationKey,
    n: usize,
    xi: Fr,
    public_inputs: &[Fr],
) -> Option<PointEvaluations> {
    let n_fr = Fr::from(n as u64);
    let xin = xi.pow([n as u64]);
    let zh = xin - Fr::ONE;

    let mut lagrange = Vec::with_capacity(public_inputs.len().max(1));
    let mut w = Fr::ONE;
    for _ in 0..public_inputs.len().max(1) {
        let denominator = (n_fr * (xi - w)).inverse()?;
        lagrange.push(w * zh * denominator);
        w *= vk.w;
    }
    let pi = -public_inputs
        .iter()
        .zip(&lagrange)
        .map(|(x, l)| *x * l)
        .sum::<Fr>();
    Some(PointEvaluations {
        xin,
        zh,
        l1: lagrange[0],
        pi,
    })
}

/// Verifies a PLONK proof, replaying the transcript itself.
///
/// Returns `Ok(false)` for proofs that fail the pairing check, and errors for keys or
/// inputs that cannot be verified against at all.
#[tracing::instrument(skip_all, name = "Plonk.verify", fields(n_public = public_inputs.len()))]
pub fn verify(
    vk: &VerificationKey,
    proof: &PlonkProof,
    public_inputs: &[Fr],
) -> VerificationResult<bool> {
    check_public_input_length(vk, public_inputs)?;
    validate_key(vk)?;
    for p in proof.commitments() {
        ensure_g1(&p)?;
    }
    let challenges = compute_challenges(vk, proof, public_inputs)?;
    verify_challenged(vk, proof, public_inputs, &challenges)
}

/// Verifies a PLONK proof against challenges claimed by the caller. The transcript is
/// replayed anyway and any difference is a [`VerificationError::TranscriptMismatch`].
pub fn verify_with_challenges(
    vk: &VerificationKey,
    proof: &PlonkProof,
    public_inputs: &[Fr],
    claimed: &Challenges,
) -> VerificationResult<bool> {
    check_public_input_length(vk, public_inputs)?;
    validate_key(vk)?;
    for p in proof.commitments() {
        ensure_g1(&p)?;
    }
    let challenges = compute_challenges(vk, proof, public_inputs)?;
    if challenges != *claimed {
        return Err(VerificationError::TranscriptMismatch(
            "claimed challenges differ from the transcript".to_owned(),
        ));
    }
    verify_challenged(vk, proof, public_inputs, &challenges)
}

fn verify_challenged(
    vk: &VerificationKey,
    proof: &PlonkProof,
    public_inputs: &[Fr],
    ch: &Challenges,
) -> VerificationResult<bool> {
    // validated by the callers
    let n = vk.domain_size().ok_or_else(|| {
        VerificationError::MalformedInput(format!("power {} out of range", vk.power))
    })?;
    let Some(PointEvaluations { xin, zh, l1, pi }) = evaluate_at_xi(vk, n, ch.xi, public_inputs)
    else {
        tracing::warn!("evaluation point lies in the domain, rejecting");
        return Ok(false);
    };
    let Challenges {
        beta,
        gamma,
        alpha,
        xi,
        v,
        u,
    } = *ch;
    let alpha2 = alpha.square();

    // r0 = PI − L₁α² − α(a+βs1+γ)(b+βs2+γ)(c+γ)·zw
    let e3a = proof.eval_a + beta * proof.eval_s1 + gamma;
    let e3b = proof.eval_b + beta * proof.eval_s2 + gamma;
    let e3c = proof.eval_c + gamma;
    let r0 = pi - l1 * alpha2 - e3a * e3b * e3c * proof.eval_zw * alpha;

    // D
    let betaxi = beta * xi;
    let d2a = proof.eval_a + betaxi + gamma;
    let d2b = proof.eval_b + betaxi * vk.k1 + gamma;
    let d2c = proof.eval_c + betaxi * vk.k2 + gamma;
    let z_coeff = d2a * d2b * d2c * alpha + l1 * alpha2 + u;
    let s3_coeff = e3a * e3b * alpha * beta * proof.eval_zw;
    let ab = proof.eval_a * proof.eval_b;
    let d = linear_combination(
        &[
            vk.qm, vk.ql, vk.qr, vk.qo, vk.qc, proof.z, vk.s3, proof.t1, proof.t2, proof.t3,
        ],
        &[
            ab,
            proof.eval_a,
            proof.eval_b,
            proof.eval_c,
            Fr::ONE,
            z_coeff,
            -s3_coeff,
            -zh,
            -zh * xin,
            -zh * xin.square(),
        ],
    )?;

    // F = D + v₁A + v₂B + v₃C + v₄S1 + v₅S2
    let f = d + linear_combination(&[proof.a, proof.b, proof.c, vk.s1, vk.s2], &v)?;

    // E = (−r0 + v₁a + v₂b + v₃c + v₄s1 + v₅s2 + u·zw)·G1
    let e_scalar = -r0
        + v[0] * proof.eval_a
        + v[1] * proof.eval_b
        + v[2] * proof.eval_c
        + v[3] * proof.eval_s1
        + v[4] * proof.eval_s2
        + u * proof.eval_zw;
    let e = scalar_mul(&G1Affine::generator(), &e_scalar);

    let a1: G1Projective = proof.wxi.into_group() + scalar_mul(&proof.wxiw, &u);
    let xiw = xi * vk.w;
    let b1 = scalar_mul(&proof.wxi, &xi) + scalar_mul(&proof.wxiw, &(u * xiw)) + f - e;

    let (a1, b1) = {
        let batch = G1Projective::normalize_batch(&[-a1, b1]);
        (batch[0], batch[1])
    };
    let accepted = pairing_product_is_one(&[(a1, vk.x_2), (b1, G2Affine::generator())]);
    if !accepted {
        tracing::debug!("pairing check failed");
    }
    Ok(accepted)
}

/// Unit type implementing [`crate::ProofSystem`] for PLONK.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plonk;

impl crate::ProofSystem for Plonk {
    type VerifyingKey = VerificationKey;
    type Proof = PlonkProof;

    const SCHEME: crate::Scheme = crate::Scheme::Plonk;

    fn verify(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[Fr],
    ) -> VerificationResult<bool> {
        verify(vk, proof, public_inputs)
    }
}
