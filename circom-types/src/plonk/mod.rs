//! This module defines the snarkjs PLONK artifacts.
mod proof;
mod verification_key;

pub use proof::PlonkProof;
pub use verification_key::VerificationKey;

/// The `protocol` tag snarkjs writes into PLONK artifacts.
pub const PROTOCOL: &str = "plonk";

pub(crate) fn default_protocol() -> String {
    PROTOCOL.to_owned()
}
