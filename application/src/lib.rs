//! Threaded execution of the committed auction.
//!
//! The sequential core processes one child ledger at a time; here every
//! child verifier gets its own OS thread, which is sound because no two
//! children share any mutable state. Three rules keep the parallel round
//! equivalent to the sequential one:
//!
//! 1. a child's full pipeline completes before its winners are submitted;
//! 2. submissions travel over an `mpsc` channel, so appends into the
//!    parent's pool are atomic and never interleave;
//! 3. the parent does no work until a barrier has seen every expected
//!    contribution — a missing contribution aborts the round, it is not a
//!    recoverable condition.
//!
//! Arrival order across children is a race, so contributions carry their
//! child index and are replayed into the parent in index order after the
//! barrier; tie-breaking then matches the sequential pipeline exactly.

use std::sync::mpsc;
use std::thread;

use sealed_auction_core::config::AuctionConfig;
use sealed_auction_core::error::AuctionError;
use sealed_auction_core::protocols::committed::{
    finish_parent_round, AuctionOutcome, BidSubmission, ParentVerifier,
};
use sealed_auction_core::utils::derive_component_rng;
use tracing::{info, warn};

pub mod child_worker;
pub mod shared_types;

use child_worker::ChildWorker;
use shared_types::AuctionMessage;

/// Runs one committed auction round with one thread per child ledger.
/// Deterministic for a given `master_seed`: every component derives its own
/// RNG stream from it.
pub fn run_parallel_auction(
    groups: Vec<Vec<BidSubmission>>,
    m: usize,
    config: &AuctionConfig,
    master_seed: u64,
) -> Result<AuctionOutcome, AuctionError> {
    config.validate()?;

    let mut parent_rng = derive_component_rng(master_seed, "parent");
    let mut parent = ParentVerifier::new(config.key_bits, &mut parent_rng)?;
    let parent_key = parent.public_key().clone();

    let expected = groups.len();
    let (tx, rx) = mpsc::channel::<AuctionMessage>();

    let mut handles = Vec::with_capacity(expected);
    for (index, submissions) in groups.into_iter().enumerate() {
        let worker = ChildWorker::new(
            index,
            submissions,
            m,
            config.clone(),
            parent_key.clone(),
            master_seed,
        );
        let tx = tx.clone();
        handles.push(thread::spawn(move || worker.run(&tx)));
    }
    // The collector's recv loop ends on disconnect, once every worker has
    // dropped its sender.
    drop(tx);

    let mut contributions = Vec::with_capacity(expected);
    let mut failure: Option<AuctionError> = None;
    while let Ok(message) = rx.recv() {
        match message {
            AuctionMessage::Contribution { child_index, winners } => {
                info!(child_index, winners = winners.len(), "contribution received");
                contributions.push((child_index, winners));
            }
            AuctionMessage::Failure { child_index, error } => {
                warn!(child_index, %error, "child aborted the round");
                failure.get_or_insert(error);
            }
        }
    }

    for handle in handles {
        let _ = handle.join();
    }

    if let Some(error) = failure {
        return Err(error);
    }
    if contributions.len() != expected {
        return Err(AuctionError::MissingContribution {
            expected,
            received: contributions.len(),
        });
    }

    contributions.sort_by_key(|(child_index, _)| *child_index);
    for (_, winners) in contributions {
        parent.collect_encrypted_winners(winners);
    }

    let mut round_rng = derive_component_rng(master_seed, "coefficients");
    finish_parent_round(parent, m, config, &mut round_rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use sealed_auction_core::protocols::committed::verify_vector_commitment;
    use sealed_auction_core::protocols::ordinal::{run_ordinal_auction, Bidder};

    fn groups() -> Vec<Vec<BidSubmission>> {
        vec![
            vec![
                BidSubmission::new("CBC_0_User_0", 12),
                BidSubmission::new("CBC_0_User_1", 29),
                BidSubmission::new("CBC_0_User_2", 7),
            ],
            vec![
                BidSubmission::new("CBC_1_User_0", 22),
                BidSubmission::new("CBC_1_User_1", 4),
            ],
            vec![
                BidSubmission::new("CBC_2_User_0", 30),
                BidSubmission::new("CBC_2_User_1", 22),
            ],
        ]
    }

    #[test]
    fn parallel_round_matches_the_plaintext_baseline() {
        let config = AuctionConfig::default();
        let outcome = run_parallel_auction(groups(), 2, &config, 7).unwrap();

        let ordinal_groups: Vec<Vec<Bidder>> = groups()
            .iter()
            .map(|group| {
                group.iter().map(|s| Bidder::new(s.bidder_id.clone(), s.bid_value)).collect()
            })
            .collect();
        let baseline = run_ordinal_auction(&ordinal_groups, 2);

        let parallel_ids: Vec<_> = outcome.winners.iter().map(|w| w.bidder_id.as_str()).collect();
        let baseline_ids: Vec<_> = baseline.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(parallel_ids, baseline_ids);
    }

    #[test]
    fn published_commitment_survives_external_recomputation() {
        let config = AuctionConfig::default();
        let outcome = run_parallel_auction(groups(), 2, &config, 11).unwrap();

        let values: Vec<BigUint> = outcome.winners.iter().map(|w| w.value.clone()).collect();
        assert!(verify_vector_commitment(
            &values,
            &outcome.blinding_coefficients,
            &outcome.parent_public_key.modulus,
            &outcome.vector_commitment,
        ));
    }

    #[test]
    fn identical_seeds_reproduce_the_round() {
        let config = AuctionConfig::default();
        let first = run_parallel_auction(groups(), 2, &config, 13).unwrap();
        let second = run_parallel_auction(groups(), 2, &config, 13).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn child_failure_aborts_the_whole_round() {
        let config = AuctionConfig::default();
        let mut bad_groups = groups();
        bad_groups[1].push(BidSubmission::new("CBC_1_User_2", 31)); // above max_bid

        assert!(matches!(
            run_parallel_auction(bad_groups, 2, &config, 17),
            Err(AuctionError::BidOutOfRange { bid_value: 31, .. })
        ));
    }
}
