//! This module defines the [`PublicInput`] struct that allows loading public inputs from JSON files via [`serde::Deserialize`] and [`serde::Serialize`].

use std::io::Read;

use ark_ff::{BigInt, PrimeField};
use serde::{Deserialize, Serialize};

use crate::TypesError;

/// The public signals of a proof, as written to `public.json` by snarkjs. Both proof
/// systems share the format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicInput<F: PrimeField<BigInt = BigInt<4>>>(
    /// The values of the public input.
    #[serde(serialize_with = "ark_serde_compat::serialize_f_seq")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f_seq")]
    pub Vec<F>,
);

impl<F: PrimeField<BigInt = BigInt<4>>> PublicInput<F> {
    /// Reads public signals from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, TypesError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Consumes `self` and returns the inner values.
    pub fn into_inner(self) -> Vec<F> {
        self.0
    }
}

impl<F: PrimeField<BigInt = BigInt<4>>> AsRef<[F]> for PublicInput<F> {
    fn as_ref(&self) -> &[F] {
        &self.0
    }
}

impl<F: PrimeField<BigInt = BigInt<4>>> From<Vec<F>> for PublicInput<F> {
    fn from(values: Vec<F>) -> Self {
        Self(values)
    }
}
