//! Groth16 verification on BN254.
//!
//! A proof `(A, B, C)` for public inputs `x` is accepted iff
//! `e(A, B) = e(α, β) · e(vk_x, γ) · e(C, δ)` with `vk_x = IC₀ + Σ xᵢ·ICᵢ₊₁`,
//! evaluated as one pairing product `e(−A, B) · e(α, β) · e(vk_x, γ) · e(C, δ) = 1`.

use ark_bn254::{Bn254, Fr, G1Affine, G1Projective};
use ark_ec::{
    AffineRepr, CurveGroup,
    pairing::{Pairing, PairingOutput},
};
use ark_ff::Zero;
use ark_groth16::{Proof, VerifyingKey};

use crate::{
    VerificationError, VerificationResult,
    curve::{ensure_g1, ensure_g2, linear_combination, pairing, pairing_product_is_one},
};

/// A verifying key together with the cached `e(α, β)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedVerifyingKey {
    /// The verifying key.
    pub vk: VerifyingKey<Bn254>,
    /// `e(α, β)`
    pub alpha_g1_beta_g2: PairingOutput<Bn254>,
}

impl PreparedVerifyingKey {
    /// The number of public inputs the key expects.
    pub fn n_public(&self) -> usize {
        self.vk.gamma_abc_g1.len().saturating_sub(1)
    }
}

impl From<VerifyingKey<Bn254>> for PreparedVerifyingKey {
    fn from(vk: VerifyingKey<Bn254>) -> Self {
        prepare_verifying_key(vk)
    }
}

/// Computes `e(α, β)` once for repeated verification against `vk`.
pub fn prepare_verifying_key(vk: VerifyingKey<Bn254>) -> PreparedVerifyingKey {
    let alpha_g1_beta_g2 = pairing(vk.alpha_g1, vk.beta_g2);
    PreparedVerifyingKey {
        vk,
        alpha_g1_beta_g2,
    }
}

/// Computes `vk_x = IC₀ + Σ xᵢ·ICᵢ₊₁`.
pub fn prepare_inputs(
    vk: &VerifyingKey<Bn254>,
    public_inputs: &[Fr],
) -> VerificationResult<G1Projective> {
    let Some((ic0, ic)) = vk.gamma_abc_g1.split_first() else {
        return Err(VerificationError::MalformedInput(
            "verifying key has an empty IC".to_owned(),
        ));
    };
    if public_inputs.len() != ic.len() {
        return Err(VerificationError::InvalidPublicInputLength {
            expected: ic.len(),
            actual: public_inputs.len(),
        });
    }
    Ok(ic0.into_group() + linear_combination(ic, public_inputs)?)
}

fn ensure_proof(proof: &Proof<Bn254>) -> VerificationResult<()> {
    ensure_g1(&proof.a)?;
    ensure_g2(&proof.b)?;
    ensure_g1(&proof.c)
}

/// Verifies `proof` against an unprepared key with a single four-term pairing product.
#[tracing::instrument(skip_all, name = "Groth16.verify", fields(n_public = public_inputs.len()))]
pub fn verify(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> VerificationResult<bool> {
    ensure_proof(proof)?;
    let vk_x = prepare_inputs(vk, public_inputs)?.into_affine();
    let neg_a: G1Affine = (-proof.a.into_group()).into_affine();
    let accepted = pairing_product_is_one(&[
        (neg_a, proof.b),
        (vk.alpha_g1, vk.beta_g2),
        (vk_x, vk.gamma_g2),
        (proof.c, vk.delta_g2),
    ]);
    if !accepted {
        tracing::debug!("pairing check failed");
    }
    Ok(accepted)
}

/// Verifies `proof` reusing the cached `e(α, β)` of a prepared key.
#[tracing::instrument(skip_all, name = "Groth16.verify_prepared", fields(n_public = public_inputs.len()))]
pub fn verify_prepared(
    pvk: &PreparedVerifyingKey,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> VerificationResult<bool> {
    ensure_proof(proof)?;
    let vk = &pvk.vk;
    let vk_x = prepare_inputs(vk, public_inputs)?.into_affine();
    let neg_a: G1Affine = (-proof.a.into_group()).into_affine();
    let product = Bn254::multi_pairing([neg_a, vk_x, proof.c], [proof.b, vk.gamma_g2, vk.delta_g2])
        + pvk.alpha_g1_beta_g2;
    let accepted = product.is_zero();
    if !accepted {
        tracing::debug!("pairing check failed");
    }
    Ok(accepted)
}

/// Unit type implementing [`crate::ProofSystem`] for Groth16 over prepared keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16;

impl crate::ProofSystem for Groth16 {
    type VerifyingKey = PreparedVerifyingKey;
    type Proof = Proof<Bn254>;

    const SCHEME: crate::Scheme = crate::Scheme::Groth16;

    fn verify(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[Fr],
    ) -> VerificationResult<bool> {
        verify_prepared(vk, proof, public_inputs)
    }
}
