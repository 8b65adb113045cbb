//! # Core Value Types
//!
//! ## Clusters
//!
//! - **Chain**: `Address`, `Hash`, `U256`
//! - **Identity**: `PublicKeyHash`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// The all-zero address.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Encode a `U256` as a 32-byte big-endian word.
pub fn u256_to_word(value: &U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Decode a 32-byte big-endian word into a `U256`.
pub fn word_to_u256(word: &[u8; 32]) -> U256 {
    U256::from_big_endian(word)
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// Compact identifier of a wallet: `keccak256` of its serialized BLS public key.
///
/// Wherever a full public key would be too large (batch submissions, storage
/// keys) this hash stands in for it.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PublicKeyHash(#[serde_as(as = "Bytes")] pub Hash);

impl PublicKeyHash {
    /// Wrap raw digest bytes.
    pub const fn new(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Borrow the digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Short hex prefix used in log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<Hash> for PublicKeyHash {
    fn from(bytes: Hash) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKeyHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyHash({})", self)
    }
}
