//! # Aggregation
//!
//! Aggregation is plain group addition: it is commutative and associative, so
//! the order in which a relayer collects signatures never matters.
//!
//! The aggregator never looks at what was signed. Binding each
//! signature to exactly one `(payload, identity)` pair, and refusing
//! duplicated pairs, happens in the authorization verifier.

use blst::min_sig::{AggregatePublicKey, AggregateSignature, PublicKey, Signature};

use super::curve;
use super::keys::{BlsPublicKey, BlsSignature};
use super::DST;
use crate::CryptoError;

/// Aggregate multiple BLS signatures into one.
///
/// # Errors
/// * `EmptyAggregation` if the input list is empty
/// * `AggregationFailed` if the sum is the identity point
pub fn aggregate_signatures(signatures: &[BlsSignature]) -> Result<BlsSignature, CryptoError> {
    if signatures.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }

    let refs: Vec<&Signature> = signatures.iter().map(BlsSignature::point).collect();
    // Inputs were subgroup-checked when decoded
    let aggregate =
        AggregateSignature::aggregate(&refs, false).map_err(|_| CryptoError::AggregationFailed)?;

    finish_signature(aggregate.to_signature())
}

/// Aggregate multiple BLS public keys into one.
///
/// Only meaningful when every signer signed the same message; the wallet
/// protocol always signs distinct messages and verifies pair by pair.
///
/// # Errors
/// * `EmptyAggregation` if the input list is empty
pub fn aggregate_public_keys(public_keys: &[BlsPublicKey]) -> Result<BlsPublicKey, CryptoError> {
    if public_keys.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }

    let refs: Vec<&PublicKey> = public_keys.iter().map(BlsPublicKey::point).collect();
    let aggregate =
        AggregatePublicKey::aggregate(&refs, false).map_err(|_| CryptoError::AggregationFailed)?;

    // Re-validate: keys can cancel out to the identity
    curve::decode_g2(&aggregate.to_public_key().serialize()).map(BlsPublicKey::from_point)
}

/// Verify an aggregate signature over `(message, public_key)` pairs.
///
/// Each pair is checked with its own key and its own message. Returns `false`
/// for an empty pair list.
pub fn verify_aggregate(signature: &BlsSignature, pairs: &[(&[u8], &BlsPublicKey)]) -> bool {
    let points: Vec<(&[u8], &PublicKey)> = pairs
        .iter()
        .map(|(message, public_key)| (*message, public_key.point()))
        .collect();
    curve::pairing_check(signature.point(), &points, DST)
}

/// Incremental aggregation for relayers that receive signatures one by one.
#[derive(Default)]
pub struct AggregateSignatureBuilder {
    aggregate: Option<AggregateSignature>,
    count: usize,
}

impl AggregateSignatureBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one signature to the running sum.
    pub fn add(&mut self, signature: &BlsSignature) -> &mut Self {
        match self.aggregate.as_mut() {
            Some(aggregate) => aggregate.add_aggregate(&AggregateSignature::from_signature(
                signature.point(),
            )),
            None => self.aggregate = Some(AggregateSignature::from_signature(signature.point())),
        }
        self.count += 1;
        self
    }

    /// Number of signatures added so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no signature has been added.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Produce the aggregate signature.
    ///
    /// # Errors
    /// * `EmptyAggregation` if nothing was added
    pub fn finish(&self) -> Result<BlsSignature, CryptoError> {
        let aggregate = self.aggregate.as_ref().ok_or(CryptoError::EmptyAggregation)?;
        finish_signature(aggregate.to_signature())
    }
}

fn finish_signature(signature: Signature) -> Result<BlsSignature, CryptoError> {
    // An identity-point aggregate carries no authorization
    curve::decode_g1(&signature.compress(), false)
        .map(BlsSignature::from_point)
        .map_err(|_| CryptoError::AggregationFailed)
}
