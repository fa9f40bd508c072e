//! This module defines the snarkjs Groth16 artifacts and their conversions into
//! [`ark_groth16`] types.
mod proof;
mod verification_key;

pub use proof::Groth16Proof;
pub use verification_key::VerificationKey;

/// The `protocol` tag snarkjs writes into Groth16 artifacts.
pub const PROTOCOL: &str = "groth16";

pub(crate) fn default_protocol() -> String {
    PROTOCOL.to_owned()
}
