//! Solidity calldata of the snarkjs verifier contracts.
//!
//! `snarkjs groth16 exportsoliditycalldata` prints the arguments of
//! `verifyProof(uint[2] a, uint[2][2] b, uint[2] c, uint[n] input)` as
//!
//! ```text
//! ["0xa0", "0xa1"],[["0xb01", "0xb00"],["0xb11", "0xb10"]],["0xc0", "0xc1"],["0xi0",...]
//! ```
//!
//! with every word as 64 hex digits and the G2 coordinates in EVM order (`c1` before
//! `c0`). The PLONK variant prints the 24 proof words followed by the public signals;
//! releases before 0.7 printed the proof as a single `0x` byte string instead, which is
//! accepted as well. The point at infinity is `(0, 0)` in both.

use std::{fmt, str::FromStr};

use alloy_primitives::U256;
use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_groth16::Proof;
use circom_types::plonk::{PlonkProof, VerificationKey};

use crate::{
    VerificationError, VerificationResult,
    curve::{fr_from_u256, g1_from_coordinates, g2_from_coordinates, to_u256},
    groth16::PreparedVerifyingKey,
};

/// Number of words in a PLONK proof: nine G1 points and six evaluations.
pub const PLONK_PROOF_WORDS: usize = 24;

/// Prepare an uncompressed Groth16 proof for the verifier contract.
/// The proof is represented as an array of 8 U256 values, corresponding to the
/// x and y coordinates of the points A, B, and C in the proof.
pub fn prepare_uncompressed_proof(proof: &Proof<Bn254>) -> [U256; 8] {
    let [ax, ay] = g1_words(&proof.a);
    let [[bx1, bx0], [by1, by0]] = g2_words(&proof.b);
    let [cx, cy] = g1_words(&proof.c);
    [ax, ay, bx1, bx0, by1, by0, cx, cy]
}

fn g1_words(p: &G1Affine) -> [U256; 2] {
    // Infinity is represented as (0, 0)
    p.xy()
        .map(|(x, y)| [x.into(), y.into()])
        .unwrap_or_default()
}

/// `[[x.c1, x.c0], [y.c1, y.c0]]`
fn g2_words(p: &G2Affine) -> [[U256; 2]; 2] {
    // Infinity is represented as (0, 0, 0, 0)
    p.xy()
        .map(|(x, y)| [[x.c1.into(), x.c0.into()], [y.c1.into(), y.c0.into()]])
        .unwrap_or_default()
}

fn g1_from_words(words: &[U256]) -> VerificationResult<G1Affine> {
    g1_from_coordinates(words[0], words[1])
}

fn word_to_hex(w: &U256) -> String {
    format!("0x{}", hex::encode(w.to_be_bytes::<32>()))
}

/// `["0x..", "0x.."]`, joined with `sep` the way snarkjs joins each array.
fn quoted_list(words: &[U256], sep: &str) -> String {
    let words = words
        .iter()
        .map(|w| format!("\"{}\"", word_to_hex(w)))
        .collect::<Vec<_>>();
    format!("[{}]", words.join(sep))
}

/// Splits a calldata string into its words, ignoring the bracket structure.
fn parse_words(s: &str) -> VerificationResult<Vec<U256>> {
    s.split(',')
        .map(|token| {
            token
                .chars()
                .filter(|c| !matches!(c, '"' | '[' | ']') && !c.is_whitespace())
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .map(|token| ark_serde_compat::parse_u256(&token).map_err(VerificationError::from))
        .collect()
}

fn inputs_to_words(public_inputs: &[Fr]) -> Vec<U256> {
    public_inputs.iter().map(to_u256).collect()
}

fn words_to_inputs(words: &[U256]) -> VerificationResult<Vec<Fr>> {
    words.iter().copied().map(fr_from_u256).collect()
}

/// Arguments of the Groth16 contract's `verifyProof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groth16Calldata {
    /// `A`
    pub a: [U256; 2],
    /// `B` with coordinates in EVM order
    pub b: [[U256; 2]; 2],
    /// `C`
    pub c: [U256; 2],
    /// public signals
    pub inputs: Vec<U256>,
}

impl Groth16Calldata {
    /// Encodes a proof and its public inputs.
    pub fn new(proof: &Proof<Bn254>, public_inputs: &[Fr]) -> Self {
        Self {
            a: g1_words(&proof.a),
            b: g2_words(&proof.b),
            c: g1_words(&proof.c),
            inputs: inputs_to_words(public_inputs),
        }
    }

    /// Decodes the proof and public inputs, validating every word like the contract's
    /// field checks and precompiles do.
    pub fn decode(&self) -> VerificationResult<(Proof<Bn254>, Vec<Fr>)> {
        let [[bx1, bx0], [by1, by0]] = self.b;
        let proof = Proof {
            a: g1_from_words(&self.a)?,
            b: g2_from_coordinates(bx0, bx1, by0, by1)?,
            c: g1_from_words(&self.c)?,
        };
        Ok((proof, words_to_inputs(&self.inputs)?))
    }

    /// Runs `verifyProof` on these arguments.
    pub fn verify(&self, pvk: &PreparedVerifyingKey) -> VerificationResult<bool> {
        let (proof, inputs) = self.decode()?;
        crate::groth16::verify_prepared(pvk, &proof, &inputs)
    }
}

impl fmt::Display for Groth16Calldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},[{},{}],{},{}",
            quoted_list(&self.a, ", "),
            quoted_list(&self.b[0], ", "),
            quoted_list(&self.b[1], ", "),
            quoted_list(&self.c, ", "),
            quoted_list(&self.inputs, ",")
        )
    }
}

impl FromStr for Groth16Calldata {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = parse_words(s)?;
        if words.len() < 8 {
            return Err(VerificationError::MalformedInput(format!(
                "Groth16 calldata needs at least 8 words, got {}",
                words.len()
            )));
        }
        Ok(Self {
            a: [words[0], words[1]],
            b: [[words[2], words[3]], [words[4], words[5]]],
            c: [words[6], words[7]],
            inputs: words[8..].to_vec(),
        })
    }
}

/// Arguments of the PLONK contract's `verifyProof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlonkCalldata {
    /// `A, B, C, Z, T1, T2, T3, Wxi, Wxiw` as `x, y` pairs, then
    /// `eval_a, eval_b, eval_c, eval_s1, eval_s2, eval_zw`
    pub proof: [U256; PLONK_PROOF_WORDS],
    /// public signals
    pub inputs: Vec<U256>,
}

impl PlonkCalldata {
    /// Encodes a proof and its public inputs.
    pub fn new(proof: &PlonkProof, public_inputs: &[Fr]) -> Self {
        let mut words = [U256::ZERO; PLONK_PROOF_WORDS];
        for (i, p) in proof.commitments().iter().enumerate() {
            words[2 * i..2 * i + 2].copy_from_slice(&g1_words(p));
        }
        for (i, e) in proof.evaluations().iter().enumerate() {
            words[18 + i] = to_u256(e);
        }
        Self {
            proof: words,
            inputs: inputs_to_words(public_inputs),
        }
    }

    /// The proof as the single byte string of snarkjs releases before 0.7.
    pub fn legacy_proof_bytes(&self) -> String {
        let bytes = self
            .proof
            .iter()
            .flat_map(|w| w.to_be_bytes::<32>())
            .collect::<Vec<_>>();
        format!("0x{}", hex::encode(bytes))
    }

    /// Decodes the proof and public inputs.
    pub fn decode(&self) -> VerificationResult<(PlonkProof, Vec<Fr>)> {
        let w = &self.proof;
        let point = |i: usize| g1_from_words(&w[2 * i..2 * i + 2]);
        let eval = |i: usize| fr_from_u256(w[18 + i]);
        let proof = PlonkProof {
            a: point(0)?,
            b: point(1)?,
            c: point(2)?,
            z: point(3)?,
            t1: point(4)?,
            t2: point(5)?,
            t3: point(6)?,
            wxi: point(7)?,
            wxiw: point(8)?,
            eval_a: eval(0)?,
            eval_b: eval(1)?,
            eval_c: eval(2)?,
            eval_s1: eval(3)?,
            eval_s2: eval(4)?,
            eval_zw: eval(5)?,
            protocol: circom_types::plonk::PROTOCOL.to_owned(),
            curve: circom_types::CIRCOM_CURVE_NAME.to_owned(),
        };
        Ok((proof, words_to_inputs(&self.inputs)?))
    }

    /// Runs `verifyProof` on these arguments.
    pub fn verify(&self, vk: &VerificationKey) -> VerificationResult<bool> {
        let (proof, inputs) = self.decode()?;
        crate::plonk::verify(vk, &proof, &inputs)
    }
}

impl fmt::Display for PlonkCalldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            quoted_list(&self.proof, ", "),
            quoted_list(&self.inputs, ",")
        )
    }
}

fn parse_legacy_plonk(s: &str) -> VerificationResult<PlonkCalldata> {
    let (blob, inputs) = s.split_once(',').unwrap_or((s, ""));
    let blob = blob.trim().trim_matches('"');
    let digits = blob
        .strip_prefix("0x")
        .or_else(|| blob.strip_prefix("0X"))
        .unwrap_or(blob);
    let bytes = hex::decode(digits)
        .map_err(|err| VerificationError::MalformedInput(format!("proof bytes: {err}")))?;
    if bytes.len() != 32 * PLONK_PROOF_WORDS {
        return Err(VerificationError::MalformedInput(format!(
            "PLONK proof has {} bytes, expected {}",
            bytes.len(),
            32 * PLONK_PROOF_WORDS
        )));
    }
    let mut proof = [U256::ZERO; PLONK_PROOF_WORDS];
    for (word, chunk) in proof.iter_mut().zip(bytes.chunks_exact(32)) {
        *word = U256::from_be_slice(chunk);
    }
    Ok(PlonkCalldata {
        proof,
        inputs: parse_words(inputs)?,
    })
}

impl FromStr for PlonkCalldata {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start();
        if !trimmed.starts_with('[') {
            return parse_legacy_plonk(trimmed);
        }
        let words = parse_words(s)?;
        if words.len() < PLONK_PROOF_WORDS {
            return Err(VerificationError::MalformedInput(format!(
                "PLONK calldata needs at least {PLONK_PROOF_WORDS} words, got {}",
                words.len()
            )));
        }
        let mut proof = [U256::ZERO; PLONK_PROOF_WORDS];
        proof.copy_from_slice(&words[..PLONK_PROOF_WORDS]);
        Ok(Self {
            proof,
            inputs: words[PLONK_PROOF_WORDS..].to_vec(),
        })
    }
}
