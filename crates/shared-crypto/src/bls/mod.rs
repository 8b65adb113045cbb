//! # BLS12-381 Signatures (min-sig layout)
//!
//! Signatures live in G1 (48 bytes compressed), public keys in G2 (96 bytes
//! compressed). Small signatures keep the relayer's batch payload compact;
//! the larger keys are referenced by their hash wherever possible.
//!
//! - `curve`: hash-to-curve, point decoding with subgroup checks, pairing check
//! - `keys`: keypairs, public keys, signatures, proofs of possession
//! - `aggregate`: signature/public-key aggregation and aggregate verification

pub mod aggregate;
pub mod curve;
pub mod keys;

/// Domain separation tag for hash-to-G1.
///
/// Fixed for the protocol: a signature produced under any other tag never
/// verifies here, and signatures produced here are useless elsewhere.
pub const DST: &[u8] = b"BLSWALLET_V1_BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Domain separation tag for proofs of possession.
///
/// Kept apart from [`DST`] so a proof can never be replayed as an
/// authorization signature, nor the other way round.
pub const POP_DST: &[u8] = b"BLSWALLET_V1_BLS12381G1_XMD:SHA-256_SSWU_RO_POP_";
