//! # Shared Crypto - BLS Wallet Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `bls::curve` | BLS12-381 hash-to-curve, subgroup checks, pairing | Verification core |
//! | `bls::keys` | BLS keypairs (min-sig layout) | Wallet signing keys |
//! | `bls::aggregate` | G1 point addition | One signature per batch |
//! | `hashing` | Keccak-256 | Call data and public-key identifiers |
//!
//! ## Security Properties
//!
//! - **BLS**: deterministic signing, no per-signature randomness
//! - **Subgroup checks**: every decoded point is validated before use
//! - **Secret keys**: zeroized on drop, redacted from `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bls;
pub mod errors;
pub mod hashing;

// Re-exports
pub use bls::aggregate::{
    aggregate_public_keys, aggregate_signatures, verify_aggregate, AggregateSignatureBuilder,
};
pub use bls::keys::{BlsKeyPair, BlsPublicKey, BlsSecretKey, BlsSignature};
pub use bls::{DST, POP_DST};
pub use errors::CryptoError;
pub use hashing::{keccak256, keccak256_many};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
