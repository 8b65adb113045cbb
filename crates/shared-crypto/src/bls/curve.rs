//! # Curve and Pairing Primitives
//!
//! Thin, typed layer over `blst` for the operations the signer and verifier
//! are built from:
//!
//! - point decoding with on-curve and subgroup validation
//! - the product-of-pairings check `e(σ, g2) == Π e(H(mᵢ), pkᵢ)`, hashing
//!   each message to G1 (SSWU, random-oracle encoding) under the caller's DST
//!
//! Points are validated once, when decoded. The pairing check therefore runs
//! with key validation disabled and only re-checks the signature subgroup.

use blst::min_sig::{PublicKey, Signature};
use blst::BLST_ERROR;

use crate::CryptoError;

/// Secret scalar length in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Compressed G1 point length (signatures).
pub const SIGNATURE_LEN: usize = 48;

/// Compressed G2 point length (public keys).
pub const PUBLIC_KEY_LEN: usize = 96;

/// Uncompressed G2 point length (public-key hashing input).
pub const PUBLIC_KEY_SERIALIZED_LEN: usize = 192;

/// Minimum input key material accepted by IETF KeyGen.
pub const MIN_IKM_LEN: usize = 32;

/// Decode a G1 point (signature).
///
/// Rejects encodings that are malformed, off-curve or outside the prime-order
/// subgroup. The identity point is rejected unless `allow_infinity` is set.
pub fn decode_g1(bytes: &[u8], allow_infinity: bool) -> Result<Signature, CryptoError> {
    Signature::sig_validate(bytes, !allow_infinity).map_err(|_| CryptoError::InvalidSignature)
}

/// Decode a G2 point (public key).
///
/// Accepts the 96-byte compressed or 192-byte serialized form. Rejects
/// malformed, off-curve, out-of-subgroup and identity points.
pub fn decode_g2(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::key_validate(bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Run the pairing check for `signature` over `(message, public_key)` pairs.
///
/// A single pair is the plain BLS verification equation; several pairs are the
/// multi-message aggregate equation. An empty pair list never verifies.
///
/// Distinctness of the pairs is NOT checked here: callers bind each pair to
/// its own identity and nonce before reaching this point.
pub fn pairing_check(signature: &Signature, pairs: &[(&[u8], &PublicKey)], dst: &[u8]) -> bool {
    let result = match pairs {
        [] => return false,
        [(message, public_key)] => signature.verify(true, message, dst, &[], public_key, false),
        _ => {
            let messages: Vec<&[u8]> = pairs.iter().map(|(message, _)| *message).collect();
            let public_keys: Vec<&PublicKey> = pairs.iter().map(|(_, pk)| *pk).collect();
            signature.aggregate_verify(true, &messages, dst, &public_keys, false)
        }
    };
    result == BLST_ERROR::BLST_SUCCESS
}
