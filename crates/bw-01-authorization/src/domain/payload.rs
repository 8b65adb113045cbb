//! # Payload Codec
//!
//! The byte string a wallet key signs. Every field is fixed-width so the
//! layout is unambiguous:
//!
//! ```text
//! offset  len  field
//!      0   32  domain separator  keccak256(0xfeedbee5)
//!     32   32  chain_id          big-endian
//!     64   32  nonce             big-endian
//!     96   32  reward            big-endian
//!    128   32  value             big-endian
//!    160   20  target
//!    180   32  keccak256(call_data)
//! ```
//!
//! [`Payload::message`] is the only place the layout is produced; signer and
//! verifier both go through it.

use serde::{Deserialize, Serialize};
use shared_crypto::{keccak256, BlsKeyPair, BlsSignature};
use shared_types::{u256_to_word, word_to_u256, Address, Hash, PublicKeyHash, U256};
use std::fmt;
use std::sync::LazyLock;
use subtle::ConstantTimeEq;

use super::errors::AuthorizationError;

/// Total length of an encoded signed message.
pub const SIGNED_MESSAGE_LEN: usize = 212;

const DOMAIN_TAG: [u8; 4] = [0xfe, 0xed, 0xbe, 0xe5];

const CHAIN_ID_AT: usize = 32;
const NONCE_AT: usize = 64;
const REWARD_AT: usize = 96;
const VALUE_AT: usize = 128;
const TARGET_AT: usize = 160;
const CALL_DATA_HASH_AT: usize = 180;

static DOMAIN_SEPARATOR: LazyLock<Hash> = LazyLock::new(|| keccak256(&DOMAIN_TAG));

/// Fixed 32-byte prefix of every signed message.
pub fn domain_separator() -> &'static Hash {
    &DOMAIN_SEPARATOR
}

/// `keccak256(call_data)`.
pub fn hash_call_data(call_data: &[u8]) -> Hash {
    keccak256(call_data)
}

/// One wallet operation, as signed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload {
    pub chain_id: U256,
    pub nonce: U256,
    /// Paid to the relayer
    pub reward: U256,
    /// Native value forwarded with the call
    pub value: U256,
    pub target: Address,
    pub call_data_hash: Hash,
}

impl Payload {
    pub fn new(
        chain_id: U256,
        nonce: U256,
        reward: U256,
        value: U256,
        target: Address,
        call_data: &[u8],
    ) -> Self {
        Self {
            chain_id,
            nonce,
            reward,
            value,
            target,
            call_data_hash: hash_call_data(call_data),
        }
    }

    /// Encode into the signed-message layout.
    pub fn message(&self) -> SignedMessage {
        let mut bytes = [0u8; SIGNED_MESSAGE_LEN];
        bytes[..CHAIN_ID_AT].copy_from_slice(domain_separator());
        bytes[CHAIN_ID_AT..NONCE_AT].copy_from_slice(&u256_to_word(&self.chain_id));
        bytes[NONCE_AT..REWARD_AT].copy_from_slice(&u256_to_word(&self.nonce));
        bytes[REWARD_AT..VALUE_AT].copy_from_slice(&u256_to_word(&self.reward));
        bytes[VALUE_AT..TARGET_AT].copy_from_slice(&u256_to_word(&self.value));
        bytes[TARGET_AT..CALL_DATA_HASH_AT].copy_from_slice(&self.target);
        bytes[CALL_DATA_HASH_AT..].copy_from_slice(&self.call_data_hash);
        SignedMessage(bytes)
    }

    /// Constant-time check that `call_data` is what this payload committed to.
    pub fn matches_call_data(&self, call_data: &[u8]) -> bool {
        let presented = hash_call_data(call_data);
        self.call_data_hash[..].ct_eq(&presented[..]).into()
    }

    /// Copy of this payload at a different nonce.
    pub fn with_nonce(&self, nonce: U256) -> Self {
        Self {
            nonce,
            ..self.clone()
        }
    }

    /// Sign the encoded message.
    pub fn sign(&self, keypair: &BlsKeyPair) -> BlsSignature {
        keypair.sign(self.message().as_bytes())
    }
}

/// A full-width, domain-prefixed message ready for signing or verification.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedMessage([u8; SIGNED_MESSAGE_LEN]);

impl SignedMessage {
    /// Parse raw bytes, checking the length and the domain prefix.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthorizationError> {
        let bytes: [u8; SIGNED_MESSAGE_LEN] = bytes.try_into().map_err(|_| {
            AuthorizationError::malformed(format!(
                "signed message must be {SIGNED_MESSAGE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        if bytes[..CHAIN_ID_AT] != domain_separator()[..] {
            return Err(AuthorizationError::malformed("unknown domain separator"));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNED_MESSAGE_LEN] {
        &self.0
    }

    /// Read the fields back out.
    pub fn payload(&self) -> Payload {
        Payload {
            chain_id: word_at(&self.0, CHAIN_ID_AT),
            nonce: word_at(&self.0, NONCE_AT),
            reward: word_at(&self.0, REWARD_AT),
            value: word_at(&self.0, VALUE_AT),
            target: fixed_at(&self.0, TARGET_AT),
            call_data_hash: fixed_at(&self.0, CALL_DATA_HASH_AT),
        }
    }
}

impl AsRef<[u8]> for SignedMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SignedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedMessage(0x{})", hex::encode(self.0))
    }
}

fn word_at(bytes: &[u8; SIGNED_MESSAGE_LEN], at: usize) -> U256 {
    word_to_u256(&fixed_at(bytes, at))
}

fn fixed_at<const N: usize>(bytes: &[u8; SIGNED_MESSAGE_LEN], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

/// Encode operation fields straight into a signed message.
pub fn encode(
    chain_id: U256,
    nonce: U256,
    reward: U256,
    value: U256,
    target: Address,
    call_data: &[u8],
) -> SignedMessage {
    Payload::new(chain_id, nonce, reward, value, target, call_data).message()
}

/// Decode a signed message into its payload.
///
/// # Errors
/// * `MalformedInput` on wrong length or foreign domain prefix
pub fn decode(bytes: &[u8]) -> Result<Payload, AuthorizationError> {
    SignedMessage::from_bytes(bytes).map(|message| message.payload())
}

/// Sign raw message bytes, accepting only a well-formed signed message.
pub fn sign_message(
    keypair: &BlsKeyPair,
    message: &[u8],
) -> Result<BlsSignature, AuthorizationError> {
    let message = SignedMessage::from_bytes(message)?;
    Ok(keypair.sign(message.as_bytes()))
}

/// Call data a new wallet signs at creation: `walletCrossCheck(bytes32 pk_hash)`.
pub fn wallet_cross_check_call_data(public_key_hash: &PublicKeyHash) -> Vec<u8> {
    static SELECTOR: LazyLock<[u8; 4]> = LazyLock::new(|| {
        let digest = keccak256(b"walletCrossCheck(bytes32)");
        [digest[0], digest[1], digest[2], digest[3]]
    });

    let mut call_data = Vec::with_capacity(4 + 32);
    call_data.extend_from_slice(&SELECTOR[..]);
    call_data.extend_from_slice(public_key_hash.as_bytes());
    call_data
}
