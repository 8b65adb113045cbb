//! # Verification Rules
//!
//! Stateless checks applied to an authorization request. The service layer
//! runs them in a fixed order: size, chain, identity, distinctness, nonce,
//! signature. Nothing here touches shared state.

use rayon::prelude::*;
use shared_crypto::{verify_aggregate, BlsPublicKey, BlsSignature};
use shared_types::{PublicKeyHash, U256};
use std::collections::{HashMap, HashSet};

use super::entities::Identity;
use super::errors::AuthorizationError;
use super::nonce::NonceClaim;
use super::payload::{Payload, SignedMessage};

/// Reject empty and oversized batches.
pub fn check_batch_size(len: usize, max_batch_size: usize) -> Result<(), AuthorizationError> {
    if len == 0 {
        return Err(AuthorizationError::malformed("empty batch"));
    }
    if len > max_batch_size {
        return Err(AuthorizationError::malformed(format!(
            "batch of {len} exceeds limit of {max_batch_size}"
        )));
    }
    Ok(())
}

/// The payload must have been signed for this chain.
pub fn check_chain_id(expected: U256, payload: &Payload) -> Result<(), AuthorizationError> {
    if payload.chain_id != expected {
        return Err(AuthorizationError::ChainMismatch {
            expected,
            actual: payload.chain_id,
        });
    }
    Ok(())
}

/// Every `(payload, identity)` pair may appear at most once.
pub fn check_distinct(items: &[(&Payload, PublicKeyHash)]) -> Result<(), AuthorizationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for (index, (payload, identity)) in items.iter().enumerate() {
        if !seen.insert((*payload, *identity)) {
            return Err(AuthorizationError::malformed(format!(
                "item {index} repeats an earlier (payload, identity) pair for {identity}"
            )));
        }
    }
    Ok(())
}

/// Nonce assignment for a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoncePlan {
    /// One claim per distinct identity, in order of first appearance
    pub claims: Vec<NonceClaim>,
    /// Nonce consumed by each item, in presented order
    pub item_nonces: Vec<U256>,
}

/// Match presented nonces against `current`.
///
/// The k-th item (0-based) for an identity must carry `current + k`.
///
/// # Errors
/// * `UnknownIdentity` if an identity is missing from `current`
/// * `NonceMismatch` for the first item out of sequence
/// * `NonceOverflow` if the sequence passes `U256::MAX`
pub fn plan_nonces(
    items: &[(&Payload, PublicKeyHash)],
    current: &HashMap<PublicKeyHash, U256>,
) -> Result<NoncePlan, AuthorizationError> {
    let mut claims: Vec<NonceClaim> = Vec::new();
    let mut claim_index: HashMap<PublicKeyHash, usize> = HashMap::new();
    let mut item_nonces = Vec::with_capacity(items.len());

    for (payload, identity) in items {
        let index = match claim_index.get(identity) {
            Some(index) => *index,
            None => {
                let expected = current
                    .get(identity)
                    .copied()
                    .ok_or(AuthorizationError::UnknownIdentity(*identity))?;
                claims.push(NonceClaim {
                    identity: *identity,
                    expected,
                    count: 0,
                });
                claim_index.insert(*identity, claims.len() - 1);
                claims.len() - 1
            }
        };

        let claim = &mut claims[index];
        let expected = claim.next()?;
        if payload.nonce != expected {
            return Err(AuthorizationError::NonceMismatch {
                identity: *identity,
                expected,
                actual: payload.nonce,
            });
        }
        claim.count += 1;
        item_nonces.push(expected);
    }

    Ok(NoncePlan {
        claims,
        item_nonces,
    })
}

/// Encode all payloads.
pub fn signed_messages(payloads: &[&Payload]) -> Vec<SignedMessage> {
    payloads.par_iter().map(|payload| payload.message()).collect()
}

/// Subgroup-check every key in parallel.
pub fn validate_keys(identities: &[Identity]) -> Result<(), AuthorizationError> {
    identities.par_iter().try_for_each(|identity| {
        identity.public_key.validate().map_err(|_| {
            AuthorizationError::malformed(format!(
                "public key for {} failed validation",
                identity.public_key_hash
            ))
        })
    })
}

/// Single-signer check.
pub fn check_signature(
    public_key: &BlsPublicKey,
    message: &SignedMessage,
    signature: &BlsSignature,
) -> Result<(), AuthorizationError> {
    if public_key.verify(message.as_bytes(), signature) {
        Ok(())
    } else {
        Err(AuthorizationError::SignatureInvalid)
    }
}

/// One pairing check over every `(message, key)` pair.
pub fn check_aggregate_signature(
    messages: &[SignedMessage],
    identities: &[Identity],
    signature: &BlsSignature,
) -> Result<(), AuthorizationError> {
    if messages.len() != identities.len() {
        return Err(AuthorizationError::malformed(format!(
            "{} messages for {} identities",
            messages.len(),
            identities.len()
        )));
    }
    let pairs: Vec<(&[u8], &BlsPublicKey)> = messages
        .iter()
        .zip(identities)
        .map(|(message, identity)| (message.as_ref(), &identity.public_key))
        .collect();

    if verify_aggregate(signature, &pairs) {
        Ok(())
    } else {
        Err(AuthorizationError::SignatureInvalid)
    }
}
