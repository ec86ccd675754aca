use std::ops::RangeInclusive;

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commitment;
use crate::error::AuctionError;
use crate::keys::{generate_key_pair, KeyPair, RsaPublicKey};
use crate::selection::select_top_m;

use super::{EncryptedWinner, RankedCommitment};

/// The parent-ledger (PBC) verifier. Pools the re-encrypted winners from
/// every child verifier, decrypts and ranks them globally, then binds the
/// final winners into a blinded vector commitment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParentVerifier {
    key_pair: KeyPair,
    collected: Vec<EncryptedWinner>,
    decrypted_commitments: Vec<RankedCommitment>,
    final_winners: Vec<RankedCommitment>,
    blinding_coefficients: Vec<u64>,
    vector_commitment: Option<BigUint>,
}

impl ParentVerifier {
    pub fn new<R: Rng + ?Sized>(key_bits: u64, rng: &mut R) -> Result<Self, AuctionError> {
        Ok(Self {
            key_pair: generate_key_pair(key_bits, rng)?,
            collected: Vec::new(),
            decrypted_commitments: Vec::new(),
            final_winners: Vec::new(),
            blinding_coefficients: Vec::new(),
            vector_commitment: None,
        })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.key_pair.public
    }

    /// Appends one child verifier's contribution to the global pool,
    /// preserving submission order across children.
    pub fn collect_encrypted_winners(&mut self, contribution: Vec<EncryptedWinner>) {
        self.collected.extend(contribution);
    }

    pub fn collected(&self) -> &[EncryptedWinner] {
        &self.collected
    }

    /// Decrypts every pooled ciphertext with the parent's private key, in
    /// pool order. Only meaningful once all expected contributions have
    /// arrived; nothing here tracks lateness.
    pub fn decrypt_all_commitments(&mut self) -> &[RankedCommitment] {
        self.decrypted_commitments.clear();
        for entry in &self.collected {
            let value = commitment::decrypt(&entry.ciphertext, &self.key_pair.private);
            self.decrypted_commitments.push(RankedCommitment { user: entry.user.clone(), value });
        }
        &self.decrypted_commitments
    }

    /// Ranks the pooled decryptions descending by value, ties by pool
    /// order, and keeps the first `min(m, count)`: the auction's true
    /// outcome.
    pub fn select_final_winners(&mut self, m: usize) -> &[RankedCommitment] {
        self.final_winners = select_top_m(&self.decrypted_commitments, m, |entry| &entry.value);
        &self.final_winners
    }

    pub fn final_winners(&self) -> &[RankedCommitment] {
        &self.final_winners
    }

    /// Draws `m` independent blinding coefficients, uniform over `bounds`.
    /// The demonstration range is 1..=100; nothing about the draw is
    /// cryptographically unpredictable, which the non-goals accept.
    pub fn generate_blinding_coefficients<R: Rng + ?Sized>(
        &mut self,
        m: usize,
        bounds: RangeInclusive<u64>,
        rng: &mut R,
    ) -> &[u64] {
        self.blinding_coefficients = (0..m).map(|_| rng.gen_range(bounds.clone())).collect();
        &self.blinding_coefficients
    }

    pub fn blinding_coefficients(&self) -> &[u64] {
        &self.blinding_coefficients
    }

    /// Computes the running product `value_i ^ coefficient_i mod modulus`
    /// over the final winners, left to right starting from 1. Fails with
    /// `MissingInputs` unless both the final winners and the coefficients
    /// are populated.
    pub fn compute_vector_commitment(
        &mut self,
        modulus: &BigUint,
    ) -> Result<BigUint, AuctionError> {
        if self.final_winners.is_empty() || self.blinding_coefficients.is_empty() {
            return Err(AuctionError::MissingInputs);
        }

        let mut result = BigUint::one();
        for (winner, coefficient) in self.final_winners.iter().zip(&self.blinding_coefficients) {
            result = (result * winner.value.modpow(&BigUint::from(*coefficient), modulus)) % modulus;
        }

        self.vector_commitment = Some(result.clone());
        Ok(result)
    }

    pub fn vector_commitment(&self) -> Option<&BigUint> {
        self.vector_commitment.as_ref()
    }
}

/// External recomputation of a published vector commitment: any observer can
/// rebuild the product from the published winner values and coefficients
/// and compare. Coefficients beyond the winner count are ignored, matching
/// how the commitment is computed when fewer than M winners exist.
pub fn verify_vector_commitment(
    values: &[BigUint],
    coefficients: &[u64],
    modulus: &BigUint,
    expected: &BigUint,
) -> bool {
    if values.is_empty() || coefficients.len() < values.len() {
        return false;
    }
    let recomputed = values
        .iter()
        .zip(coefficients)
        .fold(BigUint::one(), |acc, (value, coefficient)| {
            (acc * value.modpow(&BigUint::from(*coefficient), modulus)) % modulus
        });
    recomputed == *expected
}
