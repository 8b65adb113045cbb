//! # Authorization Errors
//!
//! Every rejection carries its reason. Batch checks are all-or-nothing, so a
//! single error covers the whole batch.

use shared_types::{PublicKeyHash, U256};
use thiserror::Error;

/// Errors raised while decoding, checking or authorizing wallet operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Wrong lengths, empty batches, duplicates, bad prefixes
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Payload was signed for another chain
    #[error("Chain mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: U256, actual: U256 },

    /// Payload nonce is not the identity's next nonce
    #[error("Nonce mismatch for {identity}: expected {expected}, got {actual}")]
    NonceMismatch {
        identity: PublicKeyHash,
        expected: U256,
        actual: U256,
    },

    /// The (aggregate) pairing check failed. The failing item is never named.
    #[error("Signature invalid")]
    SignatureInvalid,

    /// No wallet is registered under this key hash
    #[error("Unknown identity: {0}")]
    UnknownIdentity(PublicKeyHash),

    /// A wallet is already registered under this key hash
    #[error("Identity already exists: {0}")]
    IdentityExists(PublicKeyHash),

    /// The 256-bit nonce counter cannot advance further
    #[error("Nonce overflow for {0}")]
    NonceOverflow(PublicKeyHash),
}

impl AuthorizationError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput(reason.into())
    }
}

/// Invalid values in an [`AuthorizationConfig`](crate::AuthorizationConfig).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chain_id must be non-zero")]
    ZeroChainId,

    #[error("max_batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("gateway_address must not be the zero address")]
    ZeroGateway,

    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },
}
