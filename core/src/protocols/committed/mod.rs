//! The committed two-tier protocol: bidders commit to their bids by modular
//! exponentiation, encrypt the commitments for their child verifier, and the
//! two tiers decrypt, rank and re-encrypt on the way up to the final vector
//! commitment.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

pub mod bidder;
pub mod child;
pub mod parent;
pub mod pipeline;

pub use bidder::User;
pub use child::ChildVerifier;
pub use parent::{verify_vector_commitment, ParentVerifier};
pub use pipeline::{
    finish_parent_round, run_child_round, run_committed_auction, AuctionOutcome, BidSubmission,
    WinnerRecord,
};

/// A bidder paired with the decrypted value it is ranked on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCommitment {
    pub user: User,
    pub value: BigUint,
}

/// A bidder paired with its commitment re-encrypted for the next tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedWinner {
    pub user: User,
    pub ciphertext: BigUint,
}
