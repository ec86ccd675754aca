//! The shared top-M selection used by every ranking stage.
//!
//! The ordering contract is: descending by key, ties broken by arrival
//! order. `sort_by` is a stable sort, so equal keys keep their original
//! relative positions; the stability is a correctness requirement here, not
//! an implementation detail, because tie-breaking by registration order is
//! part of the protocol.

use std::cmp::Ordering;

/// Returns the first `min(m, entries.len())` entries after a stable
/// descending sort by `key`. The input is left untouched, which also makes
/// repeated application idempotent.
pub fn select_top_m<T, K, F>(entries: &[T], m: usize, key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> &K,
{
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| descending(key(a), key(b)));
    ranked.truncate(m);
    ranked
}

fn descending<K: Ord>(a: &K, b: &K) -> Ordering {
    b.cmp(a)
}
