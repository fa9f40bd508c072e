use ark_serde_compat::SerdeCompatError;

/// Errors returned by the verifiers.
///
/// A proof that is well-formed but does not satisfy the verification equation is not an
/// error: the verifiers return `Ok(false)` for it, like the Solidity `verifyProof`
/// entry points do.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// A coordinate, scalar or key parameter is not a valid encoding.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The number of public inputs does not match the verification key.
    #[error("expected {expected} public inputs but got {actual}")]
    InvalidPublicInputLength {
        /// arity of the verification key
        expected: usize,
        /// number of public inputs supplied
        actual: usize,
    },
    /// The Fiat-Shamir transcript was driven out of order, or a claimed challenge
    /// differs from the replayed one.
    #[error("transcript mismatch: {0}")]
    TranscriptMismatch(String),
    /// The pairing check failed.
    #[error("pairing check failed")]
    PairingCheckFailed,
}

impl From<SerdeCompatError> for VerificationError {
    fn from(value: SerdeCompatError) -> Self {
        Self::MalformedInput(value.to_string())
    }
}

impl From<circom_types::TypesError> for VerificationError {
    fn from(value: circom_types::TypesError) -> Self {
        Self::MalformedInput(value.to_string())
    }
}

/// Shorthand for results of this crate.
pub type VerificationResult<T> = Result<T, VerificationError>;
