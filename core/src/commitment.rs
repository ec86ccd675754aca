//! Deterministic modular-exponentiation commitments and the unpadded
//! RSA-style encrypt/decrypt primitives layered on top of them.
//!
//! `commit` is only order-preserving while `generator^bid` stays strictly
//! below the modulus for every bid in the configured range, i.e. while no
//! modular reduction ever happens. Violating that precondition silently
//! corrupts all downstream ranking, which is why `AuctionConfig::validate`
//! refuses such parameter sets up front.

use num_bigint::BigUint;
use num_iter::range_inclusive;
use num_traits::Zero;

use crate::keys::{RsaPrivateKey, RsaPublicKey};

/// `generator^bid_value mod modulus`.
pub fn commit(bid_value: u64, generator: u64, modulus: &BigUint) -> BigUint {
    BigUint::from(generator).modpow(&BigUint::from(bid_value), modulus)
}

/// `value^e mod n`. Deterministic and unpadded: the same value under the
/// same key always yields the same ciphertext. Acceptable here because each
/// verifier only ever decrypts its own ciphertexts.
pub fn encrypt(value: &BigUint, key: &RsaPublicKey) -> BigUint {
    value.modpow(&key.exponent, &key.modulus)
}

/// `cipher^d mod n`.
pub fn decrypt(cipher: &BigUint, key: &RsaPrivateKey) -> BigUint {
    cipher.modpow(&key.exponent, &key.modulus)
}

/// Closed-form check of the ordering precondition: `generator >= 2` and
/// `generator^max_bid < modulus`, so commitments never wrap and order like
/// the bids themselves.
pub fn fits_without_wraparound(generator: u64, modulus: &BigUint, max_bid: u64) -> bool {
    if generator < 2 {
        return false;
    }
    let Ok(exponent) = u32::try_from(max_bid) else {
        return false;
    };
    BigUint::from(generator).pow(exponent) < *modulus
}

/// Walks the whole bid range and checks successive commitments are strictly
/// increasing. Parameter-change regression guard; `fits_without_wraparound`
/// is the closed-form equivalent.
pub fn verify_commitment_ordering(generator: u64, modulus: &BigUint, max_bid: u64) -> bool {
    let mut previous = BigUint::zero();
    for bid in range_inclusive(1u64, max_bid) {
        let current = commit(bid, generator, modulus);
        if current <= previous {
            return false;
        }
        previous = current;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mersenne_31() -> BigUint {
        BigUint::from(2_147_483_647u64)
    }

    #[test]
    fn commitment_is_plain_power_below_the_modulus() {
        assert_eq!(commit(10, 2, &mersenne_31()), BigUint::from(1024u64));
        assert_eq!(commit(0, 2, &mersenne_31()), BigUint::from(1u64));
    }

    #[test]
    fn wraparound_check_matches_the_boundary() {
        // 2^30 < 2^31 - 1, 2^31 is not.
        assert!(fits_without_wraparound(2, &mersenne_31(), 30));
        assert!(!fits_without_wraparound(2, &mersenne_31(), 31));
        // A constant generator never orders bids.
        assert!(!fits_without_wraparound(1, &mersenne_31(), 5));
    }

    #[test]
    fn ordering_sweep_agrees_with_closed_form() {
        assert!(verify_commitment_ordering(2, &mersenne_31(), 30));
        assert!(!verify_commitment_ordering(2, &mersenne_31(), 40));
        assert!(verify_commitment_ordering(3, &mersenne_31(), 19));
    }

    proptest! {
        #[test]
        fn commitments_order_like_bids_in_the_safe_range(v1 in 0u64..=30, v2 in 0u64..=30) {
            let modulus = mersenne_31();
            let c1 = commit(v1, 2, &modulus);
            let c2 = commit(v2, 2, &modulus);
            prop_assert_eq!(v1.cmp(&v2), c1.cmp(&c2));
        }
    }
}
