//! Sequential orchestration of the committed protocol: the §6-style call
//! contract callers program against. One child verifier is fully processed
//! (commit, encrypt, decrypt, rank, forward) before the next begins, and the
//! parent only decrypts after every child has contributed.

use num_bigint::BigUint;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuctionConfig;
use crate::error::AuctionError;
use crate::keys::RsaPublicKey;

use super::{ChildVerifier, EncryptedWinner, ParentVerifier, User};

/// One (id, bid) pair as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidSubmission {
    pub bidder_id: String,
    pub bid_value: u64,
}

impl BidSubmission {
    pub fn new(bidder_id: impl Into<String>, bid_value: u64) -> Self {
        Self { bidder_id: bidder_id.into(), bid_value }
    }
}

/// A final winner as published to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub bidder_id: String,
    /// The decrypted commitment value the ranking was computed on.
    pub value: BigUint,
    /// The plaintext bid, present only when the configuration discloses it.
    pub bid_value: Option<u64>,
}

/// Everything a committed round publishes: the ordered winners, the blinding
/// coefficients, the vector commitment, and the parent public key whose
/// modulus the commitment was computed under, so any observer can recompute
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionOutcome {
    pub winners: Vec<WinnerRecord>,
    pub blinding_coefficients: Vec<u64>,
    pub vector_commitment: BigUint,
    pub parent_public_key: RsaPublicKey,
}

/// Runs one full committed auction round over the partitioned population.
///
/// Each inner slice of `groups` becomes one child verifier's roster, in
/// order. Any precondition violation aborts the whole round; there are no
/// retries and no partial results.
pub fn run_committed_auction<R: Rng + ?Sized>(
    groups: &[Vec<BidSubmission>],
    m: usize,
    config: &AuctionConfig,
    rng: &mut R,
) -> Result<AuctionOutcome, AuctionError> {
    config.validate()?;

    let mut parent = ParentVerifier::new(config.key_bits, rng)?;
    let parent_key = parent.public_key().clone();

    for (index, group) in groups.iter().enumerate() {
        let contribution = run_child_round(format!("CBC_{index}"), group, m, config, &parent_key, rng)?;
        parent.collect_encrypted_winners(contribution);
    }

    finish_parent_round(parent, m, config, rng)
}

/// One child verifier's whole pipeline: register, commit, encrypt, decrypt,
/// rank, re-encrypt for the parent. Returns the contribution to forward.
pub fn run_child_round<R: Rng + ?Sized>(
    id: String,
    group: &[BidSubmission],
    m: usize,
    config: &AuctionConfig,
    parent_key: &RsaPublicKey,
    rng: &mut R,
) -> Result<Vec<EncryptedWinner>, AuctionError> {
    let mut child = ChildVerifier::new(id, config.key_bits, rng)?;
    let child_key = child.public_key().clone();

    for submission in group {
        child.register_user(User::new(submission.bidder_id.clone(), submission.bid_value));
    }
    for user in child.roster_mut() {
        user.create_commitment(config.generator, &config.commitment_modulus, config.max_bid)?;
        user.encrypt_commitment(&child_key)?;
    }

    child.decrypt_commitments();
    child.select_top_m(m);
    debug!(child = child.id(), winners = child.top_winners().len(), "child ranking complete");

    Ok(child.encrypt_winners_for_parent(parent_key))
}

/// The parent half of a round, shared with the threaded runner: decrypt the
/// pooled ciphertexts, rank globally, draw the blinding coefficients and
/// compute the vector commitment under the parent modulus.
pub fn finish_parent_round<R: Rng + ?Sized>(
    mut parent: ParentVerifier,
    m: usize,
    config: &AuctionConfig,
    rng: &mut R,
) -> Result<AuctionOutcome, AuctionError> {
    parent.decrypt_all_commitments();
    parent.select_final_winners(m);
    parent.generate_blinding_coefficients(
        m,
        config.min_coefficient..=config.max_coefficient,
        rng,
    );

    let modulus = parent.public_key().modulus.clone();
    let vector_commitment = parent.compute_vector_commitment(&modulus)?;
    debug!(winners = parent.final_winners().len(), "parent ranking complete");

    let winners = parent
        .final_winners()
        .iter()
        .map(|winner| WinnerRecord {
            bidder_id: winner.user.id.clone(),
            value: winner.value.clone(),
            bid_value: config.reveal_bids.then_some(winner.user.bid_value),
        })
        .collect();

    Ok(AuctionOutcome {
        winners,
        blinding_coefficients: parent.blinding_coefficients().to_vec(),
        vector_commitment,
        parent_public_key: parent.public_key().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn groups() -> Vec<Vec<BidSubmission>> {
        vec![
            vec![BidSubmission::new("a1", 3), BidSubmission::new("a2", 19)],
            vec![BidSubmission::new("b1", 11), BidSubmission::new("b2", 7)],
        ]
    }

    #[test]
    fn round_publishes_ranked_winners() {
        let mut rng = ChaCha20Rng::seed_from_u64(50);
        let outcome = run_committed_auction(&groups(), 2, &AuctionConfig::default(), &mut rng)
            .unwrap();

        let ids: Vec<_> = outcome.winners.iter().map(|w| w.bidder_id.as_str()).collect();
        assert_eq!(ids, ["a2", "b1"]);
        assert_eq!(outcome.winners[0].bid_value, Some(19));
        assert_eq!(outcome.blinding_coefficients.len(), 2);
    }

    #[test]
    fn bids_stay_sealed_when_disclosure_is_off() {
        let mut rng = ChaCha20Rng::seed_from_u64(51);
        let config = AuctionConfig { reveal_bids: false, ..AuctionConfig::default() };
        let outcome = run_committed_auction(&groups(), 1, &config, &mut rng).unwrap();
        assert!(outcome.winners.iter().all(|w| w.bid_value.is_none()));
    }

    #[test]
    fn invalid_configuration_aborts_before_any_work() {
        let mut rng = ChaCha20Rng::seed_from_u64(52);
        let config = AuctionConfig { max_bid: 1000, ..AuctionConfig::default() };
        assert!(matches!(
            run_committed_auction(&groups(), 1, &config, &mut rng),
            Err(AuctionError::CommitmentRangeOverflow { .. })
        ));
    }

    #[test]
    fn out_of_range_bid_aborts_the_round() {
        let mut rng = ChaCha20Rng::seed_from_u64(53);
        let groups = vec![vec![BidSubmission::new("big", 31)]];
        assert!(matches!(
            run_committed_auction(&groups, 1, &AuctionConfig::default(), &mut rng),
            Err(AuctionError::BidOutOfRange { bid_value: 31, .. })
        ));
    }
}
