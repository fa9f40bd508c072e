#![warn(missing_docs)]
//! This crate defines the JSON artifacts snarkjs emits for circom circuits on BN254
//! (`verification_key.json`, `proof.json`, `public.json`) for the Groth16 and PLONK
//! protocols, and utilities to read them from files.
//!
//! Every curve point is validated while deserializing, and every integer must be the
//! canonical representative of its field, so a successfully parsed value is always
//! well-formed input for a verifier.
pub mod groth16;
pub mod plonk;
mod public_input;

pub use public_input::PublicInput;

pub use ark_serde_compat::SerdeCompatError;

/// The name snarkjs uses for BN254.
pub const CIRCOM_CURVE_NAME: &str = "bn128";

/// Error type describing errors while loading snarkjs artifacts.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// Error during IO operations (reading/opening file, etc.)
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The JSON is malformed, or a number/point inside it is invalid.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The artifact was produced for a curve other than BN254.
    #[error("unsupported curve {0:?}, only {CIRCOM_CURVE_NAME} is supported")]
    UnsupportedCurve(String),
    /// The artifact belongs to a different proof system.
    #[error("expected protocol {expected:?} but got {actual:?}")]
    WrongProtocol {
        /// protocol this type represents
        expected: &'static str,
        /// protocol found in the artifact
        actual: String,
    },
    /// The fields of a verification key contradict each other.
    #[error("inconsistent verification key: {0}")]
    InconsistentKey(String),
}

/// Checks the `protocol` and `curve` tags every snarkjs artifact carries.
pub(crate) fn check_tags(
    protocol: &str,
    expected: &'static str,
    curve: &str,
) -> Result<(), TypesError> {
    if protocol != expected {
        return Err(TypesError::WrongProtocol {
            expected,
            actual: protocol.to_owned(),
        });
    }
    // older snarkjs releases wrote the arkworks name
    if !curve.eq_ignore_ascii_case(CIRCOM_CURVE_NAME) && !curve.eq_ignore_ascii_case("bn254") {
        tracing::debug!(curve, "rejecting artifact for foreign curve");
        return Err(TypesError::UnsupportedCurve(curve.to_owned()));
    }
    Ok(())
}

pub(crate) fn default_curve() -> String {
    CIRCOM_CURVE_NAME.to_owned()
}
