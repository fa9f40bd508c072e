//! PLONK `verification_key.json` as written by `snarkjs zkey export verificationkey`.

use std::io::Read;

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ff::FftField;
use serde::{Deserialize, Serialize};

use crate::{TypesError, check_tags, default_curve};

/// A PLONK verification key in snarkjs layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Always `"plonk"`.
    #[serde(default = "super::default_protocol")]
    pub protocol: String,
    /// The curve name, `"bn128"`.
    #[serde(default = "default_curve")]
    pub curve: String,
    /// The number of public inputs.
    #[serde(rename = "nPublic")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_usize")]
    pub n_public: usize,
    /// log2 of the evaluation domain size.
    #[serde(deserialize_with = "ark_serde_compat::deserialize_usize")]
    pub power: usize,
    /// Coset shift of the second wire column.
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub k1: Fr,
    /// Coset shift of the third wire column.
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub k2: Fr,
    /// Commitment to the multiplication selector.
    #[serde(rename = "Qm")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub qm: G1Affine,
    /// Commitment to the left selector.
    #[serde(rename = "Ql")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub ql: G1Affine,
    /// Commitment to the right selector.
    #[serde(rename = "Qr")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub qr: G1Affine,
    /// Commitment to the output selector.
    #[serde(rename = "Qo")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub qo: G1Affine,
    /// Commitment to the constant selector.
    #[serde(rename = "Qc")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub qc: G1Affine,
    /// First permutation commitment.
    #[serde(rename = "S1")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub s1: G1Affine,
    /// Second permutation commitment.
    #[serde(rename = "S2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub s2: G1Affine,
    /// Third permutation commitment.
    #[serde(rename = "S3")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub s3: G1Affine,
    /// `[τ]₂` from the KZG setup.
    #[serde(rename = "X_2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g2")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g2")]
    pub x_2: G2Affine,
    /// Generator of the evaluation domain.
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub w: Fr,
}

impl VerificationKey {
    /// Deserializes a [`VerificationKey`] from a reader and checks its tags and domain.
    pub fn from_reader(reader: impl Read) -> Result<Self, TypesError> {
        let vk: Self = serde_json::from_reader(reader)?;
        vk.validate()?;
        Ok(vk)
    }

    /// Checks the protocol/curve tags and that `power` does not exceed the two-adicity
    /// of the scalar field.
    pub fn validate(&self) -> Result<(), TypesError> {
        check_tags(&self.protocol, super::PROTOCOL, &self.curve)?;
        if self.power > Fr::TWO_ADICITY as usize {
            return Err(TypesError::InconsistentKey(format!(
                "power {} exceeds the two-adicity {} of the scalar field",
                self.power,
                Fr::TWO_ADICITY
            )));
        }
        Ok(())
    }

    /// The size `n = 2^power` of the evaluation domain, or `None` if `power` is out of
    /// range.
    pub fn domain_size(&self) -> Option<usize> {
        if self.power > Fr::TWO_ADICITY as usize {
            return None;
        }
        1usize.checked_shl(self.power as u32)
    }
}
