//! RSA-style key pairs for the verifier tiers.
//!
//! Key sizes are configuration, not a security parameter: the sizes used in
//! the demonstrations are far below anything safe. The only hard requirement
//! is that a key's modulus exceeds every value encrypted under it, which
//! `AuctionConfig::validate` checks ahead of time.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AuctionError;
use crate::prime::{generate_prime, SMALL_PRIMES};

const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;
const MAX_GENERATION_ATTEMPTS: u32 = 64;

/// Public half of a key pair: `(e, n)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    pub exponent: BigUint,
    pub modulus: BigUint,
}

/// Private half of a key pair: `(d, n)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateKey {
    pub exponent: BigUint,
    pub modulus: BigUint,
}

/// A verifier's key pair. Generated once per verifier, immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public: RsaPublicKey,
    pub private: RsaPrivateKey,
}

/// Generates an RSA-style key pair with a modulus of roughly `bit_length`
/// bits.
///
/// Two distinct primes of half the bit length are drawn with their top two
/// bits set, so `n = p * q` never drops below `2^(bit_length - 2)`. The
/// public exponent defaults to 65537 and falls back to random odd primes
/// below 1000 until coprime with phi. Every search is bounded; running out
/// of attempts is `KeyGenerationExhausted`, never an infinite loop.
pub fn generate_key_pair<R: Rng + ?Sized>(
    bit_length: u64,
    rng: &mut R,
) -> Result<KeyPair, AuctionError> {
    let half = bit_length / 2;

    let p = generate_prime(half, rng);
    let mut q = generate_prime(half, rng);
    let mut attempts = 0u32;
    while q == p {
        attempts += 1;
        if attempts >= MAX_GENERATION_ATTEMPTS {
            return Err(AuctionError::KeyGenerationExhausted { attempts });
        }
        q = generate_prime(half, rng);
    }

    let n = &p * &q;
    let phi = (&p - 1u32) * (&q - 1u32);

    let mut e = BigUint::from(DEFAULT_PUBLIC_EXPONENT);
    attempts = 0;
    while e.gcd(&phi) != BigUint::one() {
        attempts += 1;
        if attempts >= MAX_GENERATION_ATTEMPTS {
            return Err(AuctionError::KeyGenerationExhausted { attempts });
        }
        let fallback = SMALL_PRIMES[1..].choose(rng).copied().unwrap_or(3);
        e = BigUint::from(fallback);
    }

    let d = e
        .modinv(&phi)
        .ok_or(AuctionError::KeyGenerationExhausted { attempts: MAX_GENERATION_ATTEMPTS })?;

    Ok(KeyPair {
        public: RsaPublicKey { exponent: e, modulus: n.clone() },
        private: RsaPrivateKey { exponent: d, modulus: n },
    })
}
