//! PLONK `proof.json` as written by `snarkjs plonk prove`.

use std::io::Read;

use ark_bn254::{Fr, G1Affine};
use serde::{Deserialize, Serialize};

use crate::{TypesError, check_tags, default_curve};

/// A PLONK proof in snarkjs layout: nine G1 commitments and six opening evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlonkProof {
    /// Commitment to the left wire polynomial.
    #[serde(rename = "A")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub a: G1Affine,
    /// Commitment to the right wire polynomial.
    #[serde(rename = "B")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub b: G1Affine,
    /// Commitment to the output wire polynomial.
    #[serde(rename = "C")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub c: G1Affine,
    /// Commitment to the permutation grand product.
    #[serde(rename = "Z")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub z: G1Affine,
    /// Low chunk of the quotient polynomial.
    #[serde(rename = "T1")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub t1: G1Affine,
    /// Middle chunk of the quotient polynomial.
    #[serde(rename = "T2")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub t2: G1Affine,
    /// High chunk of the quotient polynomial.
    #[serde(rename = "T3")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub t3: G1Affine,
    /// Opening proof at ξ.
    #[serde(rename = "Wxi")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub wxi: G1Affine,
    /// Opening proof at ξω.
    #[serde(rename = "Wxiw")]
    #[serde(serialize_with = "ark_serde_compat::bn254::serialize_g1")]
    #[serde(deserialize_with = "ark_serde_compat::bn254::deserialize_g1")]
    pub wxiw: G1Affine,
    /// a(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_a: Fr,
    /// b(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_b: Fr,
    /// c(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_c: Fr,
    /// S1(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_s1: Fr,
    /// S2(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_s2: Fr,
    /// Z(ξω)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_zw: Fr,
    /// Always `"plonk"`.
    #[serde(default = "super::default_protocol")]
    pub protocol: String,
    /// The curve name, `"bn128"`.
    #[serde(default = "default_curve")]
    pub curve: String,
}

impl PlonkProof {
    /// Deserializes a [`PlonkProof`] from a reader and checks its tags.
    pub fn from_reader(reader: impl Read) -> Result<Self, TypesError> {
        let proof: Self = serde_json::from_reader(reader)?;
        proof.validate()?;
        Ok(proof)
    }

    /// Checks the protocol and curve tags.
    pub fn validate(&self) -> Result<(), TypesError> {
        check_tags(&self.protocol, super::PROTOCOL, &self.curve)
    }

    /// The nine commitments in transcript order.
    pub fn commitments(&self) -> [G1Affine; 9] {
        [
            self.a, self.b, self.c, self.z, self.t1, self.t2, self.t3, self.wxi, self.wxiw,
        ]
    }

    /// The six opening evaluations in transcript order.
    pub fn evaluations(&self) -> [Fr; 6] {
        [
            self.eval_a,
            self.eval_b,
            self.eval_c,
            self.eval_s1,
            self.eval_s2,
            self.eval_zw,
        ]
    }
}
