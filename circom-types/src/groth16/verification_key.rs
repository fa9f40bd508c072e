//! Groth16 `verification_key.json` as written by `snarkjs zkey export verificationkey`.

use std::io::Read;

use ark_bn254::{Bn254, G1Affine, G2Affine};
use serde::{Deserialize, Serialize};

use crate::{TypesError, check_tags, default_curve};

/// A Groth16 verification key in snarkjs layout.
///
/// The precomputed `vk_alphabeta_12` entry snarkjs writes is ignored; verifiers derive
/// `e(alpha, beta)` themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Always `"groth16"`.
    #[serde(default = "super::default_protocol")]
    pub protocol: String,
    /// The curve name, `"bn128"`.
    #[serde(default = "default_curve")]
    pub curve: String,
    /// The number of public inputs.
    #[serde(rename = "nPublic")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_usize")]
    pub n_public: usize,
    /// The element α of the verification key ∈ G1
    #[serde(rename = "vk_alpha_1")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub alpha_1: G1Affine,
    /// The element β of the verification key ∈ G2
    #[serde(rename = "vk_beta_2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g2")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g2")]
    pub beta_2: G2Affine,
    /// The γ of the verification key ∈ G2
    #[serde(rename = "vk_gamma_2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g2")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g2")]
    pub gamma_2: G2Affine,
    /// The element δ of the verification key ∈ G2
    #[serde(rename = "vk_delta_2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g2")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g2")]
    pub delta_2: G2Affine,
    /// Used to bind the public inputs to the proof, one more entry than `n_public`.
    #[serde(rename = "IC")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1_seq")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1_seq")]
    pub ic: Vec<G1Affine>,
}

impl VerificationKey {
    /// Deserializes a [`VerificationKey`] from a reader and checks its tags and arity.
    pub fn from_reader(reader: impl Read) -> Result<Self, TypesError> {
        let vk: Self = serde_json::from_reader(reader)?;
        vk.validate()?;
        Ok(vk)
    }

    /// Checks the protocol/curve tags and that `IC` has `nPublic + 1` entries.
    pub fn validate(&self) -> Result<(), TypesError> {
        check_tags(&self.protocol, super::PROTOCOL, &self.curve)?;
        if self.ic.len() != self.n_public + 1 {
            return Err(TypesError::InconsistentKey(format!(
                "nPublic is {} but IC has {} entries",
                self.n_public,
                self.ic.len()
            )));
        }
        Ok(())
    }
}

impl From<VerificationKey> for ark_groth16::VerifyingKey<Bn254> {
    fn from(vk: VerificationKey) -> Self {
        Self {
            alpha_g1: vk.alpha_1,
            beta_g2: vk.beta_2,
            gamma_g2: vk.gamma_2,
            delta_g2: vk.delta_2,
            gamma_abc_g1: vk.ic,
        }
    }
}

impl From<ark_groth16::VerifyingKey<Bn254>> for VerificationKey {
    fn from(vk: ark_groth16::VerifyingKey<Bn254>) -> Self {
        Self {
            protocol: super::default_protocol(),
            curve: default_curve(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            alpha_1: vk.alpha_g1,
            beta_2: vk.beta_g2,
            gamma_2: vk.gamma_g2,
            delta_2: vk.delta_g2,
            ic: vk.gamma_abc_g1,
        }
    }
}
