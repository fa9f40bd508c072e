//! Groth16 `proof.json` as written by `snarkjs groth16 prove`.

use std::io::Read;

use ark_bn254::{Bn254, G1Affine, G2Affine};
use serde::{Deserialize, Serialize};

use crate::{TypesError, check_tags, default_curve};

/// A Groth16 proof in snarkjs layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// Proof element A (or π_a) ∈ G1
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub pi_a: G1Affine,
    /// Proof element B (or π_b) ∈ G2
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g2")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g2")]
    pub pi_b: G2Affine,
    /// Proof element C (or π_c) ∈ G1
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub pi_c: G1Affine,
    /// Always `"groth16"`.
    #[serde(default = "super::default_protocol")]
    pub protocol: String,
    /// The curve name, `"bn128"`.
    #[serde(default = "default_curve")]
    pub curve: String,
}

impl Groth16Proof {
    /// Deserializes a [`Groth16Proof`] from a reader and checks its tags.
    pub fn from_reader(reader: impl Read) -> Result<Self, TypesError> {
        let proof: Self = serde_json::from_reader(reader)?;
        proof.validate()?;
        Ok(proof)
    }

    /// Checks the protocol and curve tags.
    pub fn validate(&self) -> Result<(), TypesError> {
        check_tags(&self.protocol, super::PROTOCOL, &self.curve)
    }
}

impl From<Groth16Proof> for ark_groth16::Proof<Bn254> {
    fn from(proof: Groth16Proof) -> Self {
        Self {
            a: proof.pi_a,
            b: proof.pi_b,
            c: proof.pi_c,
        }
    }
}

impl From<ark_groth16::Proof<Bn254>> for Groth16Proof {
    fn from(proof: ark_groth16::Proof<Bn254>) -> Self {
        Self {
            pi_a: proof.a,
            pi_b: proof.b,
            pi_c: proof.c,
            protocol: super::default_protocol(),
            curve: default_curve(),
        }
    }
}
