//! # BLS Keys and Signatures
//!
//! Wallet signing keys. A keypair signs arbitrary bytes under the protocol
//! DST; callers that need a specific message shape (the authorization
//! payload) enforce it one layer up.

use blst::min_sig::{PublicKey, SecretKey, Signature};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::PublicKeyHash;
use std::fmt;
use zeroize::Zeroize;

use super::curve::{
    self, MIN_IKM_LEN, PUBLIC_KEY_LEN, PUBLIC_KEY_SERIALIZED_LEN, SECRET_KEY_LEN, SIGNATURE_LEN,
};
use super::{DST, POP_DST};
use crate::{hashing, CryptoError};

/// BLS secret key bytes (32 bytes, big-endian scalar).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct BlsSecretKey([u8; SECRET_KEY_LEN]);

impl BlsSecretKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LEN]) -> Self {
        Self(*bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlsSecretKey(<redacted>)")
    }
}

// =============================================================================
// PUBLIC KEY (G2)
// =============================================================================

/// BLS public key: a validated G2 point.
#[derive(Clone)]
pub struct BlsPublicKey(PublicKey);

impl BlsPublicKey {
    /// Decode from the 96-byte compressed or 192-byte serialized form.
    ///
    /// # Errors
    /// * `InvalidPublicKey` for malformed, out-of-subgroup or identity points
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        curve::decode_g2(bytes).map(Self)
    }

    /// Serialize to the 96-byte compressed form.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.compress()
    }

    /// Serialize to the 192-byte uncompressed form.
    pub fn serialize(&self) -> [u8; PUBLIC_KEY_SERIALIZED_LEN] {
        self.0.serialize()
    }

    /// Compact identifier: `keccak256` over the uncompressed encoding.
    pub fn hash(&self) -> PublicKeyHash {
        PublicKeyHash::new(hashing::keccak256(&self.serialize()))
    }

    /// Re-run the subgroup and identity checks on the held point.
    ///
    /// Keys that came through `from_bytes` already passed them; batch
    /// verification re-checks keys that arrived by other routes.
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.0.validate().map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Verify a signature over `message` under the protocol DST.
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        self.verify_with_dst(message, signature, DST)
    }

    /// Verify a signature over `message` under an explicit DST.
    pub fn verify_with_dst(&self, message: &[u8], signature: &BlsSignature, dst: &[u8]) -> bool {
        curve::pairing_check(&signature.0, &[(message, &self.0)], dst)
    }

    /// Check a proof that the holder of this key knows its secret scalar.
    ///
    /// The proof is a signature over the compressed key under [`POP_DST`].
    /// Keys that join a same-message aggregate must pass this first, or a
    /// key chosen as `x·g2 − pk` could cancel out somebody else's key.
    pub fn verify_possession(&self, proof: &BlsSignature) -> bool {
        self.verify_with_dst(&self.to_bytes(), proof, POP_DST)
    }

    pub(crate) fn point(&self) -> &PublicKey {
        &self.0
    }

    pub(crate) fn from_point(point: PublicKey) -> Self {
        Self(point)
    }
}

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

impl std::hash::Hash for BlsPublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey({})", self.hash().short())
    }
}

// =============================================================================
// SIGNATURE (G1)
// =============================================================================

/// BLS signature: a validated, non-identity G1 point.
///
/// Single and aggregate signatures share this type; the verifier decides how
/// to check one based on the request variant it arrives in.
#[derive(Clone)]
pub struct BlsSignature(Signature);

impl BlsSignature {
    /// Decode from the 48-byte compressed form.
    ///
    /// # Errors
    /// * `InvalidSignature` for malformed, out-of-subgroup or identity points
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        curve::decode_g1(bytes, false).map(Self)
    }

    /// Serialize to the 48-byte compressed form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.compress()
    }

    pub(crate) fn point(&self) -> &Signature {
        &self.0
    }

    pub(crate) fn from_point(point: Signature) -> Self {
        Self(point)
    }
}

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsSignature(0x")?;
        for b in &bytes[..6] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

// =============================================================================
// WIRE FORMS
// =============================================================================

#[serde_as]
#[derive(Serialize, Deserialize)]
struct PublicKeyWire(#[serde_as(as = "Bytes")] [u8; PUBLIC_KEY_LEN]);

#[serde_as]
#[derive(Serialize, Deserialize)]
struct SignatureWire(#[serde_as(as = "Bytes")] [u8; SIGNATURE_LEN]);

impl Serialize for BlsPublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PublicKeyWire(self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlsPublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = PublicKeyWire::deserialize(deserializer)?;
        Self::from_bytes(&wire.0).map_err(serde::de::Error::custom)
    }
}

impl Serialize for BlsSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SignatureWire(self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlsSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = SignatureWire::deserialize(deserializer)?;
        Self::from_bytes(&wire.0).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// KEY PAIR
// =============================================================================

/// BLS key pair for signing operations.
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
    public_key_hash: PublicKeyHash,
}

impl BlsKeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let mut ikm = [0u8; MIN_IKM_LEN];
        rand::thread_rng().fill_bytes(&mut ikm);
        let keypair = Self::from_seed(&ikm).expect("32-byte IKM is always accepted");
        ikm.zeroize();
        keypair
    }

    /// Derive a key pair from input key material (IETF BLS KeyGen).
    ///
    /// The same seed always yields the same key pair.
    ///
    /// # Errors
    /// * `InvalidKeyMaterial` if `ikm` is shorter than 32 bytes
    pub fn from_seed(ikm: &[u8]) -> Result<Self, CryptoError> {
        if ikm.len() < MIN_IKM_LEN {
            return Err(CryptoError::InvalidKeyMaterial {
                min: MIN_IKM_LEN,
                actual: ikm.len(),
            });
        }
        let secret = SecretKey::key_gen(ikm, &[]).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret))
    }

    /// Create from existing secret key bytes.
    ///
    /// # Errors
    /// * `InvalidPrivateKey` if the scalar is zero or not below the group order
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_LEN]) -> Result<Self, CryptoError> {
        let secret = SecretKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret))
    }

    /// Create from an exported secret key.
    pub fn from_secret(secret: &BlsSecretKey) -> Result<Self, CryptoError> {
        Self::from_secret_bytes(secret.as_bytes())
    }

    fn from_secret_key(secret: SecretKey) -> Self {
        let public = BlsPublicKey(secret.sk_to_pk());
        let public_key_hash = public.hash();
        Self {
            secret,
            public,
            public_key_hash,
        }
    }

    /// Sign a message under the protocol DST.
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        self.sign_with_dst(message, DST)
    }

    /// Sign a message under an explicit DST.
    pub fn sign_with_dst(&self, message: &[u8], dst: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, dst, &[]))
    }

    /// Prove possession of the secret key (see [`BlsPublicKey::verify_possession`]).
    pub fn prove_possession(&self) -> BlsSignature {
        self.sign_with_dst(&self.public.to_bytes(), POP_DST)
    }

    /// Get the public key
    pub fn public_key(&self) -> &BlsPublicKey {
        &self.public
    }

    /// Get the public key hash
    pub fn public_key_hash(&self) -> PublicKeyHash {
        self.public_key_hash
    }

    /// Export the secret key (be careful with this!)
    pub fn secret_key(&self) -> BlsSecretKey {
        BlsSecretKey(self.secret.to_bytes())
    }
}

impl fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key_hash", &self.public_key_hash)
            .finish_non_exhaustive()
    }
}
