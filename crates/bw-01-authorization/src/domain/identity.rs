//! # Identity Registry
//!
//! Registered wallets keyed by public-key hash. Entries are only ever added.

use parking_lot::RwLock;
use shared_crypto::{keccak256_many, BlsPublicKey};
use shared_types::{Address, PublicKeyHash};
use std::collections::{HashMap, HashSet};

use super::entities::{Identity, IdentityRef};
use super::errors::AuthorizationError;

const WALLET_ADDRESS_TAG: &[u8] = b"bls-wallet:address";

/// Deterministic wallet address for a key hash: the low 20 bytes of
/// `keccak256(tag || pk_hash)`.
pub fn derive_wallet_address(public_key_hash: &PublicKeyHash) -> Address {
    let digest = keccak256_many(&[WALLET_ADDRESS_TAG, public_key_hash.as_bytes()]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

impl Identity {
    /// Build the identity a key would be registered as.
    pub fn for_key(public_key: BlsPublicKey) -> Self {
        let public_key_hash = public_key.hash();
        Self {
            wallet: derive_wallet_address(&public_key_hash),
            public_key,
            public_key_hash,
        }
    }
}

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    identities: RwLock<HashMap<PublicKeyHash, Identity>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, public_key_hash: &PublicKeyHash) -> Option<Identity> {
        self.identities.read().get(public_key_hash).cloned()
    }

    pub fn contains(&self, public_key_hash: &PublicKeyHash) -> bool {
        self.identities.read().contains_key(public_key_hash)
    }

    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }

    /// Look up the identity a reference points at.
    ///
    /// # Errors
    /// * `UnknownIdentity` if nothing is registered under the hash
    pub fn resolve(&self, identity: &IdentityRef) -> Result<Identity, AuthorizationError> {
        let hash = identity.public_key_hash();
        self.get(&hash)
            .ok_or(AuthorizationError::UnknownIdentity(hash))
    }

    /// Resolve many references under one read lock.
    pub fn resolve_all<'a>(
        &self,
        identities: impl IntoIterator<Item = &'a IdentityRef>,
    ) -> Result<Vec<Identity>, AuthorizationError> {
        let guard = self.identities.read();
        identities
            .into_iter()
            .map(|identity| {
                let hash = identity.public_key_hash();
                guard
                    .get(&hash)
                    .cloned()
                    .ok_or(AuthorizationError::UnknownIdentity(hash))
            })
            .collect()
    }

    /// Register every identity, or none if any is already present.
    ///
    /// # Errors
    /// * `IdentityExists` for the first hash already registered
    /// * `MalformedInput` if the same hash appears twice in `identities`
    pub fn register_all(&self, identities: Vec<Identity>) -> Result<(), AuthorizationError> {
        let mut guard = self.identities.write();
        let mut seen = HashSet::with_capacity(identities.len());
        for identity in &identities {
            if guard.contains_key(&identity.public_key_hash) {
                return Err(AuthorizationError::IdentityExists(identity.public_key_hash));
            }
            if !seen.insert(identity.public_key_hash) {
                return Err(AuthorizationError::malformed(format!(
                    "identity {} listed twice",
                    identity.public_key_hash
                )));
            }
        }
        for identity in identities {
            guard.insert(identity.public_key_hash, identity);
        }
        Ok(())
    }
}
