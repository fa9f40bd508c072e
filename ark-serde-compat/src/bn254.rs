//! BN254 (`bn128` in circom/snarkjs) entry points for `#[serde(with...)]` attributes.
//!
//! The generic helpers in the crate root cannot infer the quadratic extension config
//! of G2 from the field type alone, so these wrappers pin the curve.

use ark_bn254::{Fq2Config, G1Affine, G2Affine, g1, g2};
use ark_ff::Fp2ConfigWrapper;
use serde::{Serializer, de};

use crate::{G1SeqVisitor, G1Visitor, G2Visitor};

/// Serializes a G1 point as `[x, y, "1"]` (identity: `["0", "1", "0"]`).
pub fn serialize_g1<S: Serializer>(p: &G1Affine, ser: S) -> Result<S::Ok, S::Error> {
    crate::serialize_g1_generic(p, ser)
}

/// Serializes a G2 point as `[[x0, x1], [y0, y1], ["1", "0"]]`
/// (identity: `[["0", "0"], ["1", "0"], ["0", "0"]]`).
pub fn serialize_g2<S: Serializer>(p: &G2Affine, ser: S) -> Result<S::Ok, S::Error> {
    crate::serialize_g2_generic::<S, Fp2ConfigWrapper<Fq2Config>, g2::Config>(p, ser)
}

/// Serializes a sequence of G1 points, each as `[x, y, z]`.
pub fn serialize_g1_seq<S: Serializer>(ps: &[G1Affine], ser: S) -> Result<S::Ok, S::Error> {
    crate::serialize_g1_seq_generic(ps, ser)
}

/// Deserializes a G1 point from `[x, y, z]` and checks that it lies on the curve.
pub fn deserialize_g1<'de, D>(deserializer: D) -> Result<G1Affine, D::Error>
where
    D: de::Deserializer<'de>,
{
    deserializer.deserialize_seq(G1Visitor::<g1::Config>(Default::default()))
}

/// Deserializes a G2 point from `[[x0, x1], [y0, y1], [z0, z1]]` and checks that it lies
/// on the twist and in the prime-order subgroup.
pub fn deserialize_g2<'de, D>(deserializer: D) -> Result<G2Affine, D::Error>
where
    D: de::Deserializer<'de>,
{
    deserializer.deserialize_seq(G2Visitor::<Fp2ConfigWrapper<Fq2Config>, g2::Config>(
        Default::default(),
    ))
}

/// Deserializes a sequence of validated G1 points.
pub fn deserialize_g1_seq<'de, D>(deserializer: D) -> Result<Vec<G1Affine>, D::Error>
where
    D: de::Deserializer<'de>,
{
    deserializer.deserialize_seq(G1SeqVisitor::<g1::Config>(Default::default()))
}
