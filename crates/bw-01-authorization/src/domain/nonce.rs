//! # Nonce Store
//!
//! Per-identity replay counters. Readers take snapshots; writers advance a
//! whole batch of identities inside one write-lock section so a batch either
//! consumes all of its nonces or none.

use parking_lot::RwLock;
use shared_types::{PublicKeyHash, U256};
use std::collections::{HashMap, HashSet};

use super::errors::AuthorizationError;

/// A batch's claim on one identity: starting at `expected`, consume `count`
/// consecutive nonces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NonceClaim {
    pub identity: PublicKeyHash,
    pub expected: U256,
    pub count: u64,
}

impl NonceClaim {
    /// Nonce stored once the claim is applied.
    pub fn next(&self) -> Result<U256, AuthorizationError> {
        self.expected
            .checked_add(U256::from(self.count))
            .ok_or(AuthorizationError::NonceOverflow(self.identity))
    }
}

#[derive(Debug, Default)]
pub struct NonceStore {
    nonces: RwLock<HashMap<PublicKeyHash, U256>>,
}

impl NonceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &PublicKeyHash) -> Option<U256> {
        self.nonces.read().get(identity).copied()
    }

    /// Current nonces for `identities` under one read lock.
    ///
    /// # Errors
    /// * `UnknownIdentity` if any identity has no counter
    pub fn snapshot<'a>(
        &self,
        identities: impl IntoIterator<Item = &'a PublicKeyHash>,
    ) -> Result<HashMap<PublicKeyHash, U256>, AuthorizationError> {
        let guard = self.nonces.read();
        identities
            .into_iter()
            .map(|identity| {
                guard
                    .get(identity)
                    .map(|nonce| (*identity, *nonce))
                    .ok_or(AuthorizationError::UnknownIdentity(*identity))
            })
            .collect()
    }

    /// Create counters for new identities, all or none.
    ///
    /// # Errors
    /// * `IdentityExists` if any identity already has a counter
    /// * `MalformedInput` if the same identity appears twice in `entries`
    pub fn initialize_all(&self, entries: &[(PublicKeyHash, U256)]) -> Result<(), AuthorizationError> {
        let mut guard = self.nonces.write();
        let mut seen = HashSet::with_capacity(entries.len());
        for (identity, _) in entries {
            if guard.contains_key(identity) {
                return Err(AuthorizationError::IdentityExists(*identity));
            }
            if !seen.insert(*identity) {
                return Err(AuthorizationError::malformed(format!(
                    "identity {identity} listed twice"
                )));
            }
        }
        guard.extend(entries.iter().copied());
        Ok(())
    }

    /// Drop counters created by an `initialize_all` that could not complete.
    pub fn remove_all<'a>(&self, identities: impl IntoIterator<Item = &'a PublicKeyHash>) {
        let mut guard = self.nonces.write();
        for identity in identities {
            guard.remove(identity);
        }
    }

    /// Check every claim against the stored counter and, only if all match,
    /// advance each counter past its claim. Returns the new counters in claim
    /// order.
    ///
    /// # Errors
    /// * `UnknownIdentity` if a claimed identity has no counter
    /// * `NonceMismatch` if a counter moved since the claim was planned
    /// * `NonceOverflow` if a counter would pass `U256::MAX`
    pub fn compare_and_advance(&self, claims: &[NonceClaim]) -> Result<Vec<U256>, AuthorizationError> {
        let mut guard = self.nonces.write();

        let mut advanced = Vec::with_capacity(claims.len());
        for claim in claims {
            let stored = guard
                .get(&claim.identity)
                .copied()
                .ok_or(AuthorizationError::UnknownIdentity(claim.identity))?;
            if stored != claim.expected {
                return Err(AuthorizationError::NonceMismatch {
                    identity: claim.identity,
                    expected: stored,
                    actual: claim.expected,
                });
            }
            advanced.push(claim.next()?);
        }

        for (claim, next) in claims.iter().zip(&advanced) {
            guard.insert(claim.identity, *next);
        }
        Ok(advanced)
    }
}
