//! Seed plumbing for reproducible runs.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Derives an independent, reproducible RNG for a named component from a
/// master seed: the seed and label are hashed into a ChaCha20 seed. The same
/// master seed and label always produce the same stream, and distinct labels
/// produce unrelated streams, so concurrently running components stay
/// deterministic without sharing an RNG.
pub fn derive_component_rng(master_seed: u64, label: &str) -> ChaCha20Rng {
    let mut hasher = Sha256::new();
    hasher.update(master_seed.to_be_bytes());
    hasher.update(label.as_bytes());

    let digest = hasher.finalize();
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    ChaCha20Rng::from_seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn same_inputs_same_stream() {
        let mut a = derive_component_rng(42, "CBC_0");
        let mut b = derive_component_rng(42, "CBC_0");
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn labels_separate_streams() {
        let mut a = derive_component_rng(42, "CBC_0");
        let mut b = derive_component_rng(42, "CBC_1");
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
