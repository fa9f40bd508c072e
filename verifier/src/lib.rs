//! # zkcheck verifier
//!
//! Verification of Groth16 and PLONK proofs produced by snarkjs for circom circuits on
//! BN254, computing exactly what the `verifyProof` functions of the Solidity verifiers
//! snarkjs exports compute.
//!
//! ```rust,no_run
//! # fn main() -> Result<(), zkcheck_verifier::VerificationError> {
//! use std::fs::File;
//! use zkcheck_verifier::{Proof, VerifyingKey, read_public_inputs};
//!
//! let vk = VerifyingKey::from_json_reader(File::open("verification_key.json").unwrap(), None)?;
//! let proof = Proof::from_json_reader(File::open("proof.json").unwrap(), Some(vk.scheme()))?;
//! let public = read_public_inputs(File::open("public.json").unwrap())?;
//! let accepted = zkcheck_verifier::verify(vk.scheme(), &vk, &proof, &public)?;
//! # Ok(())
//! # }
//! ```
//!
//! A proof that fails the verification equation yields `Ok(false)`; errors are reserved
//! for inputs that cannot be checked at all (malformed encodings, wrong input arity).
#![deny(missing_docs)]

use std::{fmt, io::Read, str::FromStr};

use ark_bn254::{Bn254, Fr};
use circom_types::plonk::PlonkProof;
use serde::{Deserialize, Serialize};

pub mod calldata;
pub mod curve;
mod error;
pub mod groth16;
pub mod plonk;

pub use error::{VerificationError, VerificationResult};
pub use groth16::{Groth16, PreparedVerifyingKey};
pub use plonk::Plonk;

/// The proof systems this crate verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Groth16
    Groth16,
    /// PLONK with KZG commitments
    Plonk,
}

impl Scheme {
    /// The `protocol` tag snarkjs uses for this scheme.
    pub fn protocol(self) -> &'static str {
        match self {
            Scheme::Groth16 => circom_types::groth16::PROTOCOL,
            Scheme::Plonk => circom_types::plonk::PROTOCOL,
        }
    }

    /// Reads the `protocol` tag of a snarkjs JSON artifact.
    pub fn detect(artifact: &serde_json::Value) -> Option<Self> {
        artifact.get("protocol")?.as_str()?.parse().ok()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol())
    }
}

impl FromStr for Scheme {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(circom_types::groth16::PROTOCOL) {
            Ok(Scheme::Groth16)
        } else if s.eq_ignore_ascii_case(circom_types::plonk::PROTOCOL) {
            Ok(Scheme::Plonk)
        } else {
            Err(VerificationError::MalformedInput(format!(
                "unknown proof system {s:?}"
            )))
        }
    }
}

/// A proof system: a verification key type, a proof type and the check relating them
/// to public inputs.
pub trait ProofSystem {
    /// The verification key.
    type VerifyingKey: Send + Sync;
    /// The proof.
    type Proof: Send + Sync;

    /// Which scheme this is.
    const SCHEME: Scheme;

    /// Returns whether `proof` is valid for `public_inputs` under `vk`.
    fn verify(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[Fr],
    ) -> VerificationResult<bool>;

    /// Like [`ProofSystem::verify`], but a rejected proof is
    /// [`VerificationError::PairingCheckFailed`], the way a contract call reverts.
    fn ensure_valid(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[Fr],
    ) -> VerificationResult<()> {
        if Self::verify(vk, proof, public_inputs)? {
            Ok(())
        } else {
            Err(VerificationError::PairingCheckFailed)
        }
    }

    /// Verifies many proofs against one key. With the `parallel` feature the proofs are
    /// checked on the rayon thread pool.
    fn verify_batch(
        vk: &Self::VerifyingKey,
        batch: &[(Self::Proof, Vec<Fr>)],
    ) -> Vec<VerificationResult<bool>> {
        tracing::debug!(scheme = %Self::SCHEME, proofs = batch.len(), "verifying batch");
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            batch
                .par_iter()
                .map(|(proof, public_inputs)| Self::verify(vk, proof, public_inputs))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            batch
                .iter()
                .map(|(proof, public_inputs)| Self::verify(vk, proof, public_inputs))
                .collect()
        }
    }
}

fn resolve_scheme(artifact: &serde_json::Value, scheme: Option<Scheme>) -> VerificationResult<Scheme> {
    match scheme {
        Some(scheme) => Ok(scheme),
        None => Scheme::detect(artifact).ok_or_else(|| {
            VerificationError::MalformedInput(
                "artifact has no recognised protocol tag, the scheme must be given".to_owned(),
            )
        }),
    }
}

fn read_artifact(reader: impl Read) -> VerificationResult<serde_json::Value> {
    serde_json::from_reader(reader)
        .map_err(|err| VerificationError::MalformedInput(format!("invalid JSON: {err}")))
}

fn from_artifact<T: serde::de::DeserializeOwned>(artifact: serde_json::Value) -> VerificationResult<T> {
    serde_json::from_value(artifact).map_err(|err| VerificationError::MalformedInput(err.to_string()))
}

/// A verification key of either scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyingKey {
    /// Groth16 key with `e(α, β)` cached.
    Groth16(PreparedVerifyingKey),
    /// PLONK key.
    Plonk(circom_types::plonk::VerificationKey),
}

impl VerifyingKey {
    /// Reads a snarkjs `verification_key.json`. Without an explicit `scheme` the
    /// `protocol` tag decides.
    pub fn from_json_reader(reader: impl Read, scheme: Option<Scheme>) -> VerificationResult<Self> {
        let artifact = read_artifact(reader)?;
        match resolve_scheme(&artifact, scheme)? {
            Scheme::Groth16 => {
                let vk: circom_types::groth16::VerificationKey = from_artifact(artifact)?;
                vk.validate()?;
                let vk: ark_groth16::VerifyingKey<Bn254> = vk.into();
                Ok(VerifyingKey::Groth16(vk.into()))
            }
            Scheme::Plonk => {
                let vk: circom_types::plonk::VerificationKey = from_artifact(artifact)?;
                vk.validate()?;
                plonk::validate_key(&vk)?;
                Ok(VerifyingKey::Plonk(vk))
            }
        }
    }

    /// The scheme of this key.
    pub fn scheme(&self) -> Scheme {
        match self {
            VerifyingKey::Groth16(_) => Scheme::Groth16,
            VerifyingKey::Plonk(_) => Scheme::Plonk,
        }
    }

    /// The number of public inputs the key expects.
    pub fn n_public(&self) -> usize {
        match self {
            VerifyingKey::Groth16(pvk) => pvk.n_public(),
            VerifyingKey::Plonk(vk) => vk.n_public,
        }
    }
}

/// A proof of either scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum Proof {
    /// Groth16 proof.
    Groth16(ark_groth16::Proof<Bn254>),
    /// PLONK proof.
    Plonk(PlonkProof),
}

impl Proof {
    /// Reads a snarkjs `proof.json`. Without an explicit `scheme` the `protocol` tag
    /// decides.
    pub fn from_json_reader(reader: impl Read, scheme: Option<Scheme>) -> VerificationResult<Self> {
        let artifact = read_artifact(reader)?;
        match resolve_scheme(&artifact, scheme)? {
            Scheme::Groth16 => {
                let proof: circom_types::groth16::Groth16Proof = from_artifact(artifact)?;
                proof.validate()?;
                Ok(Proof::Groth16(proof.into()))
            }
            Scheme::Plonk => {
                let proof: PlonkProof = from_artifact(artifact)?;
                proof.validate()?;
                Ok(Proof::Plonk(proof))
            }
        }
    }

    /// The scheme of this proof.
    pub fn scheme(&self) -> Scheme {
        match self {
            Proof::Groth16(_) => Scheme::Groth16,
            Proof::Plonk(_) => Scheme::Plonk,
        }
    }
}

/// Reads a snarkjs `public.json`.
pub fn read_public_inputs(reader: impl Read) -> VerificationResult<Vec<Fr>> {
    Ok(circom_types::PublicInput::<Fr>::from_reader(reader)?.into_inner())
}

/// Verifies `proof` for `public_inputs` under `vk` with the engine selected by
/// `scheme`. Key and proof must belong to that scheme.
pub fn verify(
    scheme: Scheme,
    vk: &VerifyingKey,
    proof: &Proof,
    public_inputs: &[Fr],
) -> VerificationResult<bool> {
    match (scheme, vk, proof) {
        (Scheme::Groth16, VerifyingKey::Groth16(vk), Proof::Groth16(proof)) => {
            Groth16::verify(vk, proof, public_inputs)
        }
        (Scheme::Plonk, VerifyingKey::Plonk(vk), Proof::Plonk(proof)) => {
            Plonk::verify(vk, proof, public_inputs)
        }
        _ => Err(VerificationError::MalformedInput(format!(
            "cannot verify with {scheme}: key is {} and proof is {}",
            vk.scheme(),
            proof.scheme()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::Fr;
    use ark_ff::Field;

    use super::*;
    use crate::{groth16::tests::prove_mul, plonk::test_prover::Setup};

    fn groth16_artifacts() -> (String, String, String) {
        let (vk, proof, public) = prove_mul(1, 2);
        let vk = circom_types::groth16::VerificationKey::from(vk);
        let proof = circom_types::groth16::Groth16Proof::from(proof);
        let public = circom_types::PublicInput::from(public);
        (
            serde_json::to_string(&vk).unwrap(),
            serde_json::to_string(&proof).unwrap(),
            serde_json::to_string(&public).unwrap(),
        )
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!("groth16".parse::<Scheme>().unwrap(), Scheme::Groth16);
        assert_eq!("PLONK".parse::<Scheme>().unwrap(), Scheme::Plonk);
        assert!("fflonk".parse::<Scheme>().is_err());
        assert_eq!(Scheme::Plonk.to_string(), "plonk");
        assert_eq!(
            serde_json::to_string(&Scheme::Groth16).unwrap(),
            "\"groth16\""
        );
        assert_eq!(
            Scheme::detect(&serde_json::json!({"protocol": "plonk"})),
            Some(Scheme::Plonk)
        );
        assert_eq!(Scheme::detect(&serde_json::json!({})), None);
    }

    #[test]
    fn groth16_json_artifacts_verify() {
        let (vk, proof, public) = groth16_artifacts();
        let vk = VerifyingKey::from_json_reader(vk.as_bytes(), None).unwrap();
        assert_eq!(vk.scheme(), Scheme::Groth16);
        assert_eq!(vk.n_public(), 1);
        let proof = Proof::from_json_reader(proof.as_bytes(), None).unwrap();
        let public = read_public_inputs(public.as_bytes()).unwrap();
        assert_eq!(public, vec![Fr::from(2u64)]);
        assert!(verify(Scheme::Groth16, &vk, &proof, &public).unwrap());
        assert!(!verify(Scheme::Groth16, &vk, &proof, &[Fr::from(3u64)]).unwrap());
    }

    #[test]
    fn fixture_artifacts_verify_for_both_schemes() {
        for (scheme, vk, proof, public) in [
            (
                Scheme::Groth16,
                include_str!("../data/groth16_verification_key.json"),
                include_str!("../data/groth16_proof.json"),
                include_str!("../data/groth16_public.json"),
            ),
            (
                Scheme::Plonk,
                include_str!("../data/plonk_verification_key.json"),
                include_str!("../data/plonk_proof.json"),
                include_str!("../data/plonk_public.json"),
            ),
        ] {
            let vk = VerifyingKey::from_json_reader(vk.as_bytes(), None).unwrap();
            assert_eq!(vk.scheme(), scheme);
            assert_eq!(vk.n_public(), 2);
            let proof = Proof::from_json_reader(proof.as_bytes(), None).unwrap();
            assert_eq!(proof.scheme(), scheme);
            let public = read_public_inputs(public.as_bytes()).unwrap();
            assert_eq!(public, vec![Fr::from(2u64), Fr::from(8u64)]);
            assert!(verify(scheme, &vk, &proof, &public).unwrap());
        }
    }

    #[test]
    fn plonk_json_artifacts_verify() {
        let setup = Setup::new();
        let (proof, public) = setup.prove_multiplier3(Fr::from(1u64), Fr::from(2u64), Fr::from(4u64));
        let vk_json = serde_json::to_string(&setup.vk).unwrap();
        let proof_json = serde_json::to_string(&proof).unwrap();
        let vk = VerifyingKey::from_json_reader(vk_json.as_bytes(), None).unwrap();
        assert_eq!(vk.scheme(), Scheme::Plonk);
        let proof = Proof::from_json_reader(proof_json.as_bytes(), Some(Scheme::Plonk)).unwrap();
        assert!(verify(Scheme::Plonk, &vk, &proof, &public).unwrap());
    }

    #[test]
    fn scheme_mismatch_is_malformed() {
        let (vk, proof, public) = groth16_artifacts();
        let vk = VerifyingKey::from_json_reader(vk.as_bytes(), None).unwrap();
        let proof = Proof::from_json_reader(proof.as_bytes(), None).unwrap();
        let public = read_public_inputs(public.as_bytes()).unwrap();
        assert!(matches!(
            verify(Scheme::Plonk, &vk, &proof, &public),
            Err(VerificationError::MalformedInput(_))
        ));
        let (vk_json, _, _) = groth16_artifacts();
        assert!(matches!(
            VerifyingKey::from_json_reader(vk_json.as_bytes(), Some(Scheme::Plonk)),
            Err(VerificationError::MalformedInput(_))
        ));
    }

    #[test]
    fn untagged_artifact_needs_a_scheme() {
        let json = r#"{"pi_a": ["0", "1", "0"], "pi_b": [["0", "0"], ["1", "0"], ["0", "0"]], "pi_c": ["0", "1", "0"]}"#;
        assert!(Proof::from_json_reader(json.as_bytes(), None).is_err());
        assert!(matches!(
            Proof::from_json_reader(json.as_bytes(), Some(Scheme::Groth16)),
            Ok(Proof::Groth16(_))
        ));
        assert!(Proof::from_json_reader("not json".as_bytes(), Some(Scheme::Groth16)).is_err());
    }

    #[test]
    fn batch_verification() {
        let (vk, proof, public) = prove_mul(3, 5);
        let pvk = PreparedVerifyingKey::from(vk);
        let batch = vec![
            (proof.clone(), public.clone()),
            (proof.clone(), vec![Fr::from(16u64)]),
            (proof, vec![]),
        ];
        let results = Groth16::verify_batch(&pvk, &batch);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(true));
        assert_eq!(results[1], Ok(false));
        assert!(matches!(
            results[2],
            Err(VerificationError::InvalidPublicInputLength { .. })
        ));

        let setup = Setup::new();
        let (proof, public) = setup.prove_multiplier3(Fr::from(2u64), Fr::from(2u64), Fr::from(2u64));
        let results = Plonk::verify_batch(&setup.vk, &[(proof.clone(), public), (proof, vec![Fr::ONE, Fr::ONE])]);
        assert_eq!(results, vec![Ok(true), Ok(false)]);
    }
}
