//! Keccak-256 Fiat-Shamir transcript of the snarkjs PLONK verifier.
//!
//! Every challenge is `keccak256(buffer) mod r` where the buffer holds 32-byte
//! big-endian words: scalars as one word, G1 points as `x‖y` (the identity as two zero
//! words). The buffer is cleared after each challenge. Rounds must be driven in
//! protocol order.

use alloy_primitives::keccak256;
use ark_bn254::{Fr, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::{AdditiveGroup, PrimeField};
use circom_types::plonk::VerificationKey;

use crate::{VerificationError, VerificationResult, curve::to_u256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    BetaGamma,
    Alpha,
    Xi,
    V,
    U,
    Done,
}

/// The challenges of one PLONK proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenges {
    /// permutation challenge β
    pub beta: Fr,
    /// permutation challenge γ
    pub gamma: Fr,
    /// constraint separator α
    pub alpha: Fr,
    /// evaluation point ξ
    pub xi: Fr,
    /// opening batch powers `v¹..v⁵`
    pub v: [Fr; 5],
    /// multipoint separator u
    pub u: Fr,
}

/// Transcript state machine. Each round method absorbs the round's messages, squeezes
/// its challenge(s) and moves on; calling a round out of order is a
/// [`VerificationError::TranscriptMismatch`].
#[derive(Debug, Clone)]
pub struct Transcript {
    buffer: Vec<u8>,
    round: Round,
    beta: Fr,
    gamma: Fr,
    alpha: Fr,
    xi: Fr,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript waiting for the first round.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
            round: Round::BetaGamma,
            beta: Fr::ZERO,
            gamma: Fr::ZERO,
            alpha: Fr::ZERO,
            xi: Fr::ZERO,
        }
    }

    fn enter(&mut self, expected: Round, next: Round) -> VerificationResult<()> {
        if self.round != expected {
            return Err(VerificationError::TranscriptMismatch(format!(
                "round {expected:?} requested while at {:?}",
                self.round
            )));
        }
        self.round = next;
        Ok(())
    }

    fn absorb_scalar(&mut self, s: &Fr) {
        self.buffer.extend_from_slice(&to_u256(s).to_be_bytes::<32>());
    }

    fn absorb_g1(&mut self, p: &G1Affine) {
        match p.xy() {
            Some((x, y)) => {
                self.buffer.extend_from_slice(&to_u256(&x).to_be_bytes::<32>());
                self.buffer.extend_from_slice(&to_u256(&y).to_be_bytes::<32>());
            }
            None => self.buffer.extend_from_slice(&[0u8; 64]),
        }
    }

    fn squeeze(&mut self) -> Fr {
        let digest = keccak256(&self.buffer);
        self.buffer.clear();
        Fr::from_be_bytes_mod_order(digest.as_slice())
    }

    /// Absorbs the key's commitments, the public inputs and the wire commitments;
    /// returns `(β, γ)`.
    pub fn beta_gamma(
        &mut self,
        vk: &VerificationKey,
        public_inputs: &[Fr],
        wires: [&G1Affine; 3],
    ) -> VerificationResult<(Fr, Fr)> {
        self.enter(Round::BetaGamma, Round::Alpha)?;
        for p in [
            &vk.qm, &vk.ql, &vk.qr, &vk.qo, &vk.qc, &vk.s1, &vk.s2, &vk.s3,
        ] {
            self.absorb_g1(p);
        }
        for x in public_inputs {
            self.absorb_scalar(x);
        }
        for p in wires {
            self.absorb_g1(p);
        }
        self.beta = self.squeeze();
        let beta = self.beta;
        self.absorb_scalar(&beta);
        self.gamma = self.squeeze();
        Ok((self.beta, self.gamma))
    }

    /// Absorbs `β, γ` and the grand product commitment; returns α.
    pub fn alpha(&mut self, z: &G1Affine) -> VerificationResult<Fr> {
        self.enter(Round::Alpha, Round::Xi)?;
        let (beta, gamma) = (self.beta, self.gamma);
        self.absorb_scalar(&beta);
        self.absorb_scalar(&gamma);
        self.absorb_g1(z);
        self.alpha = self.squeeze();
        Ok(self.alpha)
    }

    /// Absorbs α and the quotient chunks; returns ξ.
    pub fn xi(&mut self, quotient: [&G1Affine; 3]) -> VerificationResult<Fr> {
        self.enter(Round::Xi, Round::V)?;
        let alpha = self.alpha;
        self.absorb_scalar(&alpha);
        for p in quotient {
            self.absorb_g1(p);
        }
        self.xi = self.squeeze();
        Ok(self.xi)
    }

    /// Absorbs ξ and the six evaluations; returns `[v, v², v³, v⁴, v⁵]`.
    pub fn v(&mut self, evaluations: &[Fr; 6]) -> VerificationResult<[Fr; 5]> {
        self.enter(Round::V, Round::U)?;
        let xi = self.xi;
        self.absorb_scalar(&xi);
        for e in evaluations {
            self.absorb_scalar(e);
        }
        let v1 = self.squeeze();
        let mut v = [v1; 5];
        for i in 1..5 {
            v[i] = v[i - 1] * v1;
        }
        Ok(v)
    }

    /// Absorbs the two opening proofs; returns u.
    pub fn u(&mut self, wxi: &G1Affine, wxiw: &G1Affine) -> VerificationResult<Fr> {
        self.enter(Round::U, Round::Done)?;
        self.absorb_g1(wxi);
        self.absorb_g1(wxiw);
        Ok(self.squeeze())
    }
}
