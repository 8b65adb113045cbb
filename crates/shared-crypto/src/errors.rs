//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key is malformed, off-curve, outside the subgroup or the identity
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Secret scalar is zero or not below the group order
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature is malformed, off-curve, outside the subgroup or the identity
    #[error("Invalid signature")]
    InvalidSignature,

    /// Input key material is too short for key generation
    #[error("Invalid key material: need at least {min} bytes, got {actual}")]
    InvalidKeyMaterial {
        /// Minimum IKM length in bytes
        min: usize,
        /// Supplied IKM length in bytes
        actual: usize,
    },

    /// Cannot aggregate an empty list
    #[error("Cannot aggregate an empty list")]
    EmptyAggregation,

    /// BLS aggregation failed
    #[error("BLS aggregation failed")]
    AggregationFailed,
}
