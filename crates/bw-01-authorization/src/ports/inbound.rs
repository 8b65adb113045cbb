//! # Inbound Ports (Driving Ports / API)
//!
//! The authorization API. Implementations must be thread-safe (`Send + Sync`)
//! and are shared behind `Arc`.

use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Address, PublicKeyHash, U256};

use crate::domain::entities::{
    AuthorizationItem, AuthorizationOutcome, AuthorizationRequest, Authorized,
    BatchAuthorization, CreateWalletRequest, Identity, IdentityRef, SignatureCheck,
};
use crate::domain::errors::AuthorizationError;
use crate::domain::payload::{wallet_cross_check_call_data, Payload};

/// Primary Authorization API.
pub trait AuthorizationApi: Send + Sync {
    // =========================================================================
    // Configuration
    // =========================================================================

    fn chain_id(&self) -> U256;

    fn gateway_address(&self) -> Address;

    fn max_batch_size(&self) -> usize;

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Authorize one operation and consume its nonce.
    ///
    /// Checks run in order: chain id, identity, nonce, signature. On any
    /// rejection the nonce is untouched.
    fn verify(
        &self,
        payload: &Payload,
        identity: &IdentityRef,
        signature: &BlsSignature,
    ) -> Result<Authorized, AuthorizationError>;

    /// Authorize a batch under one aggregate signature.
    ///
    /// All-or-nothing: every item's nonce advances, or none does.
    fn verify_batch(
        &self,
        items: &[AuthorizationItem],
        aggregate_signature: &BlsSignature,
    ) -> Result<BatchAuthorization, AuthorizationError>;

    /// [`verify_batch`](Self::verify_batch) over parallel lists.
    fn verify_batch_lists(
        &self,
        payloads: &[Payload],
        identities: &[IdentityRef],
        aggregate_signature: &BlsSignature,
    ) -> Result<BatchAuthorization, AuthorizationError> {
        if payloads.len() != identities.len() {
            return Err(AuthorizationError::MalformedInput(format!(
                "{} payloads for {} identities",
                payloads.len(),
                identities.len()
            )));
        }
        let items: Vec<AuthorizationItem> = payloads
            .iter()
            .zip(identities)
            .map(|(payload, identity)| AuthorizationItem::new(payload.clone(), identity.clone()))
            .collect();
        self.verify_batch(&items, aggregate_signature)
    }

    /// Route a tagged request to the single or aggregate check.
    fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, AuthorizationError> {
        match request {
            AuthorizationRequest::Single {
                payload,
                identity,
                signature,
            } => self
                .verify(payload, identity, signature)
                .map(AuthorizationOutcome::Single),
            AuthorizationRequest::Aggregate { items, signature } => self
                .verify_batch(items, signature)
                .map(AuthorizationOutcome::Aggregate),
        }
    }

    /// Evaluate a signature without consuming anything.
    fn check_signature(
        &self,
        payload: &Payload,
        identity: &IdentityRef,
        signature: &BlsSignature,
    ) -> Result<SignatureCheck, AuthorizationError>;

    // =========================================================================
    // Wallet Creation
    // =========================================================================

    /// The payload a new key signs to register itself.
    fn creation_payload(&self, public_key_hash: &PublicKeyHash, reward: U256) -> Payload {
        Payload::new(
            self.chain_id(),
            U256::zero(),
            reward,
            U256::zero(),
            self.gateway_address(),
            &wallet_cross_check_call_data(public_key_hash),
        )
    }

    /// Register new keys whose aggregate signature over their creation
    /// payloads verifies. Registered identities start at nonce 1.
    fn create_wallets(
        &self,
        requests: &[CreateWalletRequest],
        aggregate_signature: &BlsSignature,
    ) -> Result<Vec<Identity>, AuthorizationError>;

    /// Register a key directly at nonce 0, for wallets deployed outside the
    /// bootstrap path.
    ///
    /// `proof` must come from [`shared_crypto::BlsKeyPair::prove_possession`]
    /// for this key. It is checked before anything is written.
    fn register(
        &self,
        public_key: &BlsPublicKey,
        proof: &BlsSignature,
    ) -> Result<Identity, AuthorizationError>;

    /// Register one key with a zero reward.
    fn create_wallet(
        &self,
        public_key: &BlsPublicKey,
        signature: &BlsSignature,
    ) -> Result<Identity, AuthorizationError> {
        let mut created =
            self.create_wallets(&[CreateWalletRequest::new(public_key.clone())], signature)?;
        created
            .pop()
            .ok_or_else(|| AuthorizationError::UnknownIdentity(public_key.hash()))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Next nonce the identity accepts.
    fn nonce_of(&self, identity: &IdentityRef) -> Result<U256, AuthorizationError>;

    fn identity(&self, public_key_hash: &PublicKeyHash) -> Option<Identity>;

    fn wallet_from_hash(&self, public_key_hash: &PublicKeyHash) -> Option<Address> {
        self.identity(public_key_hash).map(|identity| identity.wallet)
    }
}
