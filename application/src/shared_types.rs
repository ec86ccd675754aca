use sealed_auction_core::error::AuctionError;
use sealed_auction_core::protocols::committed::EncryptedWinner;

/// Message types for communication between the child worker threads and the
/// collecting parent.
#[derive(Debug)]
pub enum AuctionMessage {
    /// A child verifier finished its whole pipeline and submits its
    /// re-encrypted winners.
    Contribution { child_index: usize, winners: Vec<EncryptedWinner> },
    /// A child verifier hit a precondition violation; the round is aborted.
    Failure { child_index: usize, error: AuctionError },
}
