use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commitment;
use crate::error::AuctionError;
use crate::keys::{generate_key_pair, KeyPair, RsaPublicKey};
use crate::selection::select_top_m;

use super::{EncryptedWinner, RankedCommitment, User};

/// A child-ledger (CBC) verifier. Owns a disjoint roster of users, decrypts
/// their commitments with its own private key, ranks them locally and
/// re-encrypts its top candidates for the parent tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChildVerifier {
    id: String,
    key_pair: KeyPair,
    roster: Vec<User>,
    decrypted_commitments: Vec<RankedCommitment>,
    top_winners: Vec<RankedCommitment>,
}

impl ChildVerifier {
    pub fn new<R: Rng + ?Sized>(
        id: impl Into<String>,
        key_bits: u64,
        rng: &mut R,
    ) -> Result<Self, AuctionError> {
        Ok(Self {
            id: id.into(),
            key_pair: generate_key_pair(key_bits, rng)?,
            roster: Vec::new(),
            decrypted_commitments: Vec::new(),
            top_winners: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.key_pair.public
    }

    /// Appends a user to the roster. Registration order is preserved and is
    /// the tie-breaking order for ranking. Duplicate ids are accepted;
    /// screening them is the caller's policy.
    pub fn register_user(&mut self, user: User) {
        self.roster.push(user);
    }

    pub fn roster(&self) -> &[User] {
        &self.roster
    }

    /// Mutable roster access for the bidding phase (commitment creation and
    /// encryption happen on the registered users themselves).
    pub fn roster_mut(&mut self) -> &mut [User] {
        &mut self.roster
    }

    /// Decrypts every present ciphertext with this verifier's private key,
    /// in roster order. Members that never encrypted a commitment are
    /// silently skipped; partial participation is tolerated, not an error.
    pub fn decrypt_commitments(&mut self) -> &[RankedCommitment] {
        self.decrypted_commitments.clear();
        for user in &self.roster {
            if let Some(ciphertext) = user.encrypted_commitment() {
                let value = commitment::decrypt(ciphertext, &self.key_pair.private);
                self.decrypted_commitments.push(RankedCommitment { user: user.clone(), value });
            }
        }
        &self.decrypted_commitments
    }

    pub fn decrypted_commitments(&self) -> &[RankedCommitment] {
        &self.decrypted_commitments
    }

    /// Ranks the decrypted commitments descending by value, ties by
    /// registration order, and keeps the first `min(m, count)`.
    pub fn select_top_m(&mut self, m: usize) -> &[RankedCommitment] {
        self.top_winners = select_top_m(&self.decrypted_commitments, m, |entry| &entry.value);
        &self.top_winners
    }

    pub fn top_winners(&self) -> &[RankedCommitment] {
        &self.top_winners
    }

    /// Re-encrypts the selected winners' values under the parent's public
    /// key and returns them in rank order. Does not mutate `top_winners`.
    pub fn encrypt_winners_for_parent(&self, parent_key: &RsaPublicKey) -> Vec<EncryptedWinner> {
        self.top_winners
            .iter()
            .map(|winner| EncryptedWinner {
                user: winner.user.clone(),
                ciphertext: commitment::encrypt(&winner.value, parent_key),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn modulus() -> BigUint {
        BigUint::from(2_147_483_647u64)
    }

    fn verifier_with_bids(bids: &[(&str, u64)]) -> ChildVerifier {
        let mut rng = ChaCha20Rng::seed_from_u64(30);
        let mut child = ChildVerifier::new("CBC_A", 40, &mut rng).unwrap();
        let key = child.public_key().clone();
        for &(id, bid) in bids {
            child.register_user(User::new(id, bid));
        }
        for user in child.roster_mut() {
            user.create_commitment(2, &modulus(), 30).unwrap();
            user.encrypt_commitment(&key).unwrap();
        }
        child
    }

    #[test]
    fn decryption_preserves_roster_order() {
        let mut child = verifier_with_bids(&[("u1", 3), ("u2", 9), ("u3", 5)]);
        let decrypted = child.decrypt_commitments();
        let ids: Vec<_> = decrypted.iter().map(|entry| entry.user.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2", "u3"]);
        assert_eq!(decrypted[1].value, BigUint::from(512u64));
    }

    #[test]
    fn members_without_a_ciphertext_are_skipped() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let mut child = ChildVerifier::new("CBC_B", 40, &mut rng).unwrap();
        let key = child.public_key().clone();
        child.register_user(User::new("silent", 4));
        child.register_user(User::new("active", 6));
        {
            let active = &mut child.roster_mut()[1];
            active.create_commitment(2, &modulus(), 30).unwrap();
            active.encrypt_commitment(&key).unwrap();
        }
        let decrypted = child.decrypt_commitments();
        assert_eq!(decrypted.len(), 1);
        assert_eq!(decrypted[0].user.id, "active");
    }

    #[test]
    fn selection_is_bounded_and_idempotent() {
        let mut child = verifier_with_bids(&[("u1", 3), ("u2", 9), ("u3", 5)]);
        child.decrypt_commitments();
        assert_eq!(child.select_top_m(10).len(), 3);
        let once: Vec<_> = child.select_top_m(2).to_vec();
        let twice: Vec<_> = child.select_top_m(2).to_vec();
        assert_eq!(once, twice);
        assert_eq!(once[0].user.id, "u2");
        assert_eq!(once[1].user.id, "u3");
    }

    #[test]
    fn forwarding_does_not_mutate_winners() {
        let mut child = verifier_with_bids(&[("u1", 8), ("u2", 2)]);
        child.decrypt_commitments();
        child.select_top_m(1);
        let before = child.top_winners().to_vec();

        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let parent = generate_key_pair(40, &mut rng).unwrap();
        let forwarded = child.encrypt_winners_for_parent(&parent.public);

        assert_eq!(child.top_winners(), &before[..]);
        assert_eq!(forwarded.len(), 1);
        assert_eq!(
            commitment::decrypt(&forwarded[0].ciphertext, &parent.private),
            before[0].value
        );
    }
}
