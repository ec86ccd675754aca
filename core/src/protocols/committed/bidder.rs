use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::commitment;
use crate::error::AuctionError;
use crate::keys::RsaPublicKey;

/// A bidder together with its protocol state. Identity and bid are fixed at
/// construction; the commitment and its encryption are filled in by the two
/// bidding-phase operations below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub bid_value: u64,
    commitment: Option<BigUint>,
    encrypted_commitment: Option<BigUint>,
}

impl User {
    pub fn new(id: impl Into<String>, bid_value: u64) -> Self {
        Self { id: id.into(), bid_value, commitment: None, encrypted_commitment: None }
    }

    /// Computes and stores `generator^bid_value mod modulus`.
    ///
    /// Rejects bids above `max_bid`, which guards the no-wraparound
    /// precondition of the commitment scheme. Calling this again recomputes
    /// and overwrites the stored value: an intentional idempotent recompute,
    /// not an error.
    pub fn create_commitment(
        &mut self,
        generator: u64,
        modulus: &BigUint,
        max_bid: u64,
    ) -> Result<BigUint, AuctionError> {
        if self.bid_value > max_bid {
            return Err(AuctionError::BidOutOfRange { bid_value: self.bid_value, max_bid });
        }
        let commitment = commitment::commit(self.bid_value, generator, modulus);
        self.commitment = Some(commitment.clone());
        Ok(commitment)
    }

    /// Encrypts the stored commitment under the verifier's public key and
    /// stores the ciphertext. Fails if `create_commitment` has not run;
    /// repeated calls recompute, like `create_commitment`.
    pub fn encrypt_commitment(&mut self, key: &RsaPublicKey) -> Result<BigUint, AuctionError> {
        let commitment = self
            .commitment
            .as_ref()
            .ok_or_else(|| AuctionError::CommitmentNotCreated { bidder_id: self.id.clone() })?;
        let ciphertext = commitment::encrypt(commitment, key);
        self.encrypted_commitment = Some(ciphertext.clone());
        Ok(ciphertext)
    }

    pub fn commitment(&self) -> Option<&BigUint> {
        self.commitment.as_ref()
    }

    pub fn encrypted_commitment(&self) -> Option<&BigUint> {
        self.encrypted_commitment.as_ref()
    }
}
