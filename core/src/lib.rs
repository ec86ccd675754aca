//! # Two-tier sealed-bid auction core
//!
//! Simulates a sealed-bid auction spanning multiple child ledgers (CBCs) and
//! one parent ledger (PBC): each child verifier locally ranks its bidders'
//! decrypted commitments and forwards its top candidates upward, and the
//! parent verifier re-ranks globally, producing M winners plus a publicly
//! verifiable vector commitment over their values.
//!
//! Two protocols share the same selection semantics:
//!
//! - [`protocols::committed`] — the commitment/encryption pipeline: bidders
//!   commit to their bids by modular exponentiation, encrypt the commitments
//!   under their child verifier's RSA-style key, and the two tiers decrypt,
//!   rank and re-encrypt on the way up.
//! - [`protocols::ordinal`] — the plaintext baseline used to certify the
//!   committed pipeline: identical two-tier top-M selection over raw bids.
//!
//! Everything that draws randomness takes an explicit [`rand::Rng`], so
//! whole runs are reproducible from a seed. All parameters live in
//! [`config::AuctionConfig`], which validates the numeric preconditions the
//! ranking silently depends on. The sizes used in the demonstrations are
//! toys; nothing here is a security parameter.

/// Commitment and RSA-style encryption primitives.
pub mod commitment;
/// Externalized auction parameters and their validation.
pub mod config;
/// The round-aborting error type.
pub mod error;
/// RSA-style key pair generation.
pub mod keys;
/// Prime generation and primality testing.
pub mod prime;
/// The committed protocol and the plaintext baseline.
pub mod protocols;
/// Shared stable top-M selection.
pub mod selection;
/// Seed derivation helpers.
pub mod utils;

pub use config::AuctionConfig;
pub use error::AuctionError;
