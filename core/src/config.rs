//! Auction parameters, externalized from the reference call sites.
//!
//! The numeric preconditions the protocol depends on are checked by
//! [`AuctionConfig::validate`] instead of being assumed: a parameter set
//! where commitments wrap, or where a verifier's modulus could be smaller
//! than a commitment, corrupts ranking silently and is rejected before any
//! key is generated.

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::commitment;
use crate::error::AuctionError;

/// Smallest key width `validate` accepts; below this the prime sampler has
/// no room to work with.
const MIN_KEY_BITS: u64 = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Commitment base `g`.
    pub generator: u64,
    /// Commitment modulus. Correctness needs `g^max_bid` strictly below it.
    pub commitment_modulus: BigUint,
    /// Safe maximum bid; `create_commitment` rejects anything above it.
    pub max_bid: u64,
    /// RSA modulus width for every verifier key pair. Demonstration-sized,
    /// never a security parameter.
    pub key_bits: u64,
    /// Inclusive lower bound for blinding coefficients.
    pub min_coefficient: u64,
    /// Inclusive upper bound for blinding coefficients.
    pub max_coefficient: u64,
    /// Whether final winner records disclose the plaintext bid next to the
    /// decrypted commitment value.
    pub reveal_bids: bool,
}

impl Default for AuctionConfig {
    /// Demonstration parameters that pass `validate`: the reference's
    /// Mersenne modulus 2^31 - 1 with the bid ceiling lowered to 30 so
    /// 2^30 stays below it, and 40-bit keys so every modulus exceeds every
    /// commitment.
    fn default() -> Self {
        Self {
            generator: 2,
            commitment_modulus: BigUint::from(2_147_483_647u64),
            max_bid: 30,
            key_bits: 40,
            min_coefficient: 1,
            max_coefficient: 100,
            reveal_bids: true,
        }
    }
}

impl AuctionConfig {
    /// Derives a mutually consistent parameter set for bids up to
    /// `max_bid`: the modulus `2^(max_bid + 2) - 1` keeps every commitment
    /// `2^v` strictly below it, and the key width keeps the smallest
    /// possible verifier modulus above the largest commitment.
    pub fn for_bid_ceiling(max_bid: u64) -> Self {
        let commitment_modulus = (BigUint::one() << (max_bid + 2)) - 1u32;
        Self {
            generator: 2,
            commitment_modulus,
            max_bid,
            key_bits: max_bid + 8,
            ..Self::default()
        }
    }

    /// Checks the numeric preconditions the ranking depends on.
    ///
    /// - `CommitmentRangeOverflow`: `generator^max_bid` reaches the
    ///   commitment modulus (or the generator cannot order bids at all), so
    ///   commitments would stop being monotonic in the bid.
    /// - `KeyCapacityExceeded`: the smallest modulus the key generator can
    ///   produce, `2^(key_bits - 2)`, does not exceed the largest
    ///   commitment, so decryption could return a reduced value.
    pub fn validate(&self) -> Result<(), AuctionError> {
        if !commitment::fits_without_wraparound(
            self.generator,
            &self.commitment_modulus,
            self.max_bid,
        ) {
            return Err(AuctionError::CommitmentRangeOverflow {
                generator: self.generator,
                max_bid: self.max_bid,
            });
        }

        let capacity_error = AuctionError::KeyCapacityExceeded {
            key_bits: self.key_bits,
            max_bid: self.max_bid,
        };
        if self.key_bits < MIN_KEY_BITS {
            return Err(capacity_error);
        }
        let Ok(exponent) = u32::try_from(self.max_bid) else {
            return Err(capacity_error);
        };
        let largest_commitment = BigUint::from(self.generator).pow(exponent);
        let smallest_modulus = BigUint::one() << (self.key_bits - 2);
        if largest_commitment >= smallest_modulus {
            return Err(capacity_error);
        }

        Ok(())
    }
}
