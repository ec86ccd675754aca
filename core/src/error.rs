use thiserror::Error;

/// Errors raised by the auction core. Every one of them aborts the current
/// auction round; there is no retry or partial-result policy anywhere.
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("bid value {bid_value} exceeds the safe maximum {max_bid}")]
    BidOutOfRange { bid_value: u64, max_bid: u64 },

    #[error("no commitment has been created for bidder {bidder_id}")]
    CommitmentNotCreated { bidder_id: String },

    #[error("final winners or blinding coefficients are not populated")]
    MissingInputs,

    #[error("key generation did not converge within {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },

    #[error(
        "generator {generator} does not order bids up to {max_bid} under the \
         configured commitment modulus"
    )]
    CommitmentRangeOverflow { generator: u64, max_bid: u64 },

    #[error("{key_bits}-bit keys cannot hold commitments for bids up to {max_bid}")]
    KeyCapacityExceeded { key_bits: u64, max_bid: u64 },

    #[error("expected contributions from {expected} child verifiers, received {received}")]
    MissingContribution { expected: usize, received: usize },
}
