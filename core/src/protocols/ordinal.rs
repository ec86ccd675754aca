//! The plaintext two-tier baseline: identical top-M selection over raw bid
//! values, with no commitments or encryption anywhere. For any identical bid
//! population and partitioning it must select the same winning identities as
//! the committed protocol; that agreement is the principal correctness check
//! the baseline exists for.

use serde::{Deserialize, Serialize};

use crate::selection::select_top_m;

/// A bidder in the baseline: identity and raw bid only, immutable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bidder {
    pub id: String,
    pub bid_value: u64,
}

impl Bidder {
    pub fn new(id: impl Into<String>, bid_value: u64) -> Self {
        Self { id: id.into(), bid_value }
    }
}

/// A child ledger in the baseline: holds its bidders in registration order
/// and keeps the local top M.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChildBlockchain {
    pub id: String,
    bidders: Vec<Bidder>,
    m: usize,
    top_bidders: Vec<Bidder>,
}

impl ChildBlockchain {
    pub fn new(id: impl Into<String>, bidders: Vec<Bidder>, m: usize) -> Self {
        Self { id: id.into(), bidders, m, top_bidders: Vec::new() }
    }

    pub fn bidders(&self) -> &[Bidder] {
        &self.bidders
    }

    /// Ranks descending by bid, ties by registration order, and keeps the
    /// first `min(m, count)`.
    pub fn select_top_m(&mut self) -> &[Bidder] {
        self.top_bidders = select_top_m(&self.bidders, self.m, |bidder| &bidder.bid_value);
        &self.top_bidders
    }

    pub fn top_bidders(&self) -> &[Bidder] {
        &self.top_bidders
    }
}

/// The parent ledger in the baseline: concatenates every child's local
/// winners and re-ranks globally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParentBlockchain {
    children: Vec<ChildBlockchain>,
    m: usize,
    all_winners: Vec<Bidder>,
}

impl ParentBlockchain {
    pub fn new(children: Vec<ChildBlockchain>, m: usize) -> Self {
        Self { children, m, all_winners: Vec::new() }
    }

    /// Runs each child's local selection and concatenates the results,
    /// child order first, intra-child rank order second.
    pub fn collect_winners(&mut self) {
        self.all_winners.clear();
        for child in &mut self.children {
            child.select_top_m();
            self.all_winners.extend_from_slice(child.top_bidders());
        }
    }

    pub fn all_winners(&self) -> &[Bidder] {
        &self.all_winners
    }

    /// Re-ranks the concatenation with the same stable descending sort and
    /// returns the global top `min(m, count)`.
    pub fn determine_global_winners(&self) -> Vec<Bidder> {
        select_top_m(&self.all_winners, self.m, |bidder| &bidder.bid_value)
    }
}

/// Baseline counterpart of `run_committed_auction`: each inner slice of
/// `groups` becomes one child ledger, in order.
pub fn run_ordinal_auction(groups: &[Vec<Bidder>], m: usize) -> Vec<Bidder> {
    let children = groups
        .iter()
        .enumerate()
        .map(|(index, bidders)| ChildBlockchain::new(format!("CBC_{index}"), bidders.clone(), m))
        .collect();

    let mut parent = ParentBlockchain::new(children, m);
    parent.collect_winners();
    parent.determine_global_winners()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bidders(entries: &[(&str, u64)]) -> Vec<Bidder> {
        entries.iter().map(|&(id, bid)| Bidder::new(id, bid)).collect()
    }

    #[test]
    fn child_keeps_its_local_top_m() {
        let mut child =
            ChildBlockchain::new("CBCA", bidders(&[("x", 60), ("y", 280), ("z", 120)]), 2);
        let top = child.select_top_m();
        assert_eq!(top[0].id, "y");
        assert_eq!(top[1].id, "z");
    }

    #[test]
    fn global_winners_match_brute_force_over_everyone() {
        let groups = vec![
            bidders(&[("a1", 55), ("a2", 300), ("a3", 120)]),
            bidders(&[("b1", 299), ("b2", 60)]),
            bidders(&[("c1", 120), ("c2", 180), ("c3", 51)]),
        ];

        let winners = run_ordinal_auction(&groups, 3);

        // Brute force: flatten in encounter order and stable-sort everyone.
        let everyone: Vec<Bidder> = groups.iter().flatten().cloned().collect();
        let expected = select_top_m(&everyone, 3, |bidder| &bidder.bid_value);
        assert_eq!(winners, expected);
        assert_eq!(winners[0].id, "a2");
        assert_eq!(winners[1].id, "b1");
        assert_eq!(winners[2].id, "c2");
    }

    #[test]
    fn ties_resolve_by_encounter_order_across_children() {
        let groups = vec![
            bidders(&[("first", 100), ("low", 10)]),
            bidders(&[("second", 100)]),
        ];
        let winners = run_ordinal_auction(&groups, 2);
        assert_eq!(winners[0].id, "first");
        assert_eq!(winners[1].id, "second");
    }

    #[test]
    fn m_larger_than_population_returns_everyone_ranked() {
        let groups = vec![bidders(&[("a", 5)]), bidders(&[("b", 9)])];
        let winners = run_ordinal_auction(&groups, 10);
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0].id, "b");
    }
}
