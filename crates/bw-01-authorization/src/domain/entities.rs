//! # Domain Entities
//!
//! Identities, authorization requests and their outcomes.

use serde::{Deserialize, Serialize};
use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Address, PublicKeyHash, U256};

use super::payload::Payload;

/// How a caller names the wallet behind an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityRef {
    /// Compact form used by registered wallets
    Hash(PublicKeyHash),
    /// Full key; resolved through its hash
    Key(BlsPublicKey),
}

impl IdentityRef {
    pub fn public_key_hash(&self) -> PublicKeyHash {
        match self {
            IdentityRef::Hash(hash) => *hash,
            IdentityRef::Key(key) => key.hash(),
        }
    }
}

impl From<PublicKeyHash> for IdentityRef {
    fn from(hash: PublicKeyHash) -> Self {
        IdentityRef::Hash(hash)
    }
}

impl From<&BlsPublicKey> for IdentityRef {
    fn from(key: &BlsPublicKey) -> Self {
        IdentityRef::Key(key.clone())
    }
}

/// A registered wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub public_key: BlsPublicKey,
    pub public_key_hash: PublicKeyHash,
    /// Address of the wallet contract this key controls
    pub wallet: Address,
}

/// An operation that passed authorization. Its nonce has been consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorized {
    pub identity: PublicKeyHash,
    pub wallet: Address,
    /// Nonce the operation was signed at
    pub nonce: U256,
    /// Nonce the identity will accept next
    pub next_nonce: U256,
}

/// Outcome of an aggregate check. All items share one fate, so every item in
/// a returned batch is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchAuthorization {
    pub items: Vec<Authorized>,
}

impl BatchAuthorization {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Per-item accepted flags, in presented order.
    pub fn accepted(&self) -> Vec<bool> {
        vec![true; self.items.len()]
    }
}

/// Dry-run result for a single signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCheck {
    /// Signature matches the payload and identity on this chain
    pub valid: bool,
    /// Nonce the identity accepts next
    pub next_nonce: U256,
    /// Payload nonce equals `next_nonce`
    pub fresh: bool,
}

impl SignatureCheck {
    /// Whether submitting the payload now would be accepted.
    pub fn would_authorize(&self) -> bool {
        self.valid && self.fresh
    }
}

/// One item of an aggregate request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationItem {
    pub payload: Payload,
    pub identity: IdentityRef,
}

impl AuthorizationItem {
    pub fn new(payload: Payload, identity: impl Into<IdentityRef>) -> Self {
        Self {
            payload,
            identity: identity.into(),
        }
    }
}

/// Single and aggregate submissions are distinct request shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationRequest {
    Single {
        payload: Payload,
        identity: IdentityRef,
        signature: BlsSignature,
    },
    Aggregate {
        items: Vec<AuthorizationItem>,
        signature: BlsSignature,
    },
}

/// Result shape mirrors the request shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Single(Authorized),
    Aggregate(BatchAuthorization),
}

impl AuthorizationOutcome {
    /// Accepted items in presented order.
    pub fn into_items(self) -> Vec<Authorized> {
        match self {
            AuthorizationOutcome::Single(authorized) => vec![authorized],
            AuthorizationOutcome::Aggregate(batch) => batch.items,
        }
    }
}

/// A new key asking to be registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub public_key: BlsPublicKey,
    pub reward: U256,
}

impl CreateWalletRequest {
    pub fn new(public_key: BlsPublicKey) -> Self {
        Self {
            public_key,
            reward: U256::zero(),
        }
    }

    pub fn with_reward(mut self, reward: U256) -> Self {
        self.reward = reward;
        self
    }
}
