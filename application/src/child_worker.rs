use std::sync::mpsc::Sender;

use sealed_auction_core::config::AuctionConfig;
use sealed_auction_core::error::AuctionError;
use sealed_auction_core::keys::RsaPublicKey;
use sealed_auction_core::protocols::committed::{run_child_round, BidSubmission, EncryptedWinner};
use sealed_auction_core::utils::derive_component_rng;
use tracing::debug;

use crate::shared_types::AuctionMessage;

/// Runs one child verifier's entire pipeline on its own thread: keys,
/// registration, commitments, encryption, decryption, local ranking and
/// re-encryption for the parent. The whole pipeline completes before
/// anything is submitted upward.
pub struct ChildWorker {
    index: usize,
    submissions: Vec<BidSubmission>,
    m: usize,
    config: AuctionConfig,
    parent_key: RsaPublicKey,
    master_seed: u64,
}

impl ChildWorker {
    pub fn new(
        index: usize,
        submissions: Vec<BidSubmission>,
        m: usize,
        config: AuctionConfig,
        parent_key: RsaPublicKey,
        master_seed: u64,
    ) -> Self {
        Self { index, submissions, m, config, parent_key, master_seed }
    }

    pub fn run(self, tx: &Sender<AuctionMessage>) {
        let message = match self.process() {
            Ok(winners) => AuctionMessage::Contribution { child_index: self.index, winners },
            Err(error) => AuctionMessage::Failure { child_index: self.index, error },
        };
        // A dropped receiver means the round was already aborted elsewhere;
        // nothing useful is left to report.
        let _ = tx.send(message);
    }

    fn process(&self) -> Result<Vec<EncryptedWinner>, AuctionError> {
        let id = format!("CBC_{}", self.index);
        // Each worker derives its own stream, so threads never contend for
        // an RNG and a run is reproducible from the master seed alone.
        let mut rng = derive_component_rng(self.master_seed, &id);
        debug!(child = id.as_str(), bidders = self.submissions.len(), "child pipeline starting");
        run_child_round(id, &self.submissions, self.m, &self.config, &self.parent_key, &mut rng)
    }
}
