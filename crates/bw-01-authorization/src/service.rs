//! # Authorization Service
//!
//! Application service implementing [`AuthorizationApi`].
//!
//! ## Concurrency
//!
//! The service owns the identity registry and the nonce store. A request
//! snapshots the nonces it needs, runs the pairing check without holding any
//! lock, then compares-and-advances every nonce in one write section. Two
//! requests racing for the same nonce both pass the pairing check but only the
//! first to reach the write section is accepted; the other gets
//! `NonceMismatch`.

use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Address, PublicKeyHash, U256};
use tracing::{debug, info, warn};

use crate::config::AuthorizationConfig;
use crate::domain::entities::{
    AuthorizationItem, Authorized, BatchAuthorization, CreateWalletRequest, Identity, IdentityRef,
    SignatureCheck,
};
use crate::domain::errors::AuthorizationError;
use crate::domain::identity::IdentityRegistry;
use crate::domain::nonce::NonceStore;
use crate::domain::payload::Payload;
use crate::domain::verifier;
use crate::ports::inbound::AuthorizationApi;

/// Which pairing check a request gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scheme {
    Single,
    Aggregate,
}

/// Authorization Service.
///
/// Holds the replay state for every registered wallet.
#[derive(Debug)]
pub struct Authorizer {
    config: AuthorizationConfig,
    registry: IdentityRegistry,
    nonces: NonceStore,
}

impl Authorizer {
    pub fn new(config: AuthorizationConfig) -> Self {
        Self {
            config,
            registry: IdentityRegistry::new(),
            nonces: NonceStore::new(),
        }
    }

    pub fn config(&self) -> &AuthorizationConfig {
        &self.config
    }

    /// Number of registered wallets.
    pub fn identity_count(&self) -> usize {
        self.registry.len()
    }

    fn authorize_items(
        &self,
        items: &[AuthorizationItem],
        signature: &BlsSignature,
        scheme: Scheme,
    ) -> Result<Vec<Authorized>, AuthorizationError> {
        verifier::check_batch_size(items.len(), self.config.max_batch_size)?;
        for item in items {
            verifier::check_chain_id(self.config.chain_id, &item.payload)?;
        }

        let identities = self.registry.resolve_all(items.iter().map(|item| &item.identity))?;
        let keyed: Vec<(&Payload, PublicKeyHash)> = items
            .iter()
            .zip(&identities)
            .map(|(item, identity)| (&item.payload, identity.public_key_hash))
            .collect();
        verifier::check_distinct(&keyed)?;

        let snapshot = self.nonces.snapshot(keyed.iter().map(|(_, hash)| hash))?;
        let plan = verifier::plan_nonces(&keyed, &snapshot)?;

        let payloads: Vec<&Payload> = keyed.iter().map(|(payload, _)| *payload).collect();
        let messages = verifier::signed_messages(&payloads);
        let checked = match scheme {
            Scheme::Single => {
                verifier::check_signature(&identities[0].public_key, &messages[0], signature)
            }
            Scheme::Aggregate => verifier::validate_keys(&identities).and_then(|()| {
                verifier::check_aggregate_signature(&messages, &identities, signature)
            }),
        };
        if let Err(e) = checked {
            warn!(items = items.len(), error = %e, "Rejected signature");
            return Err(e);
        }

        if let Err(e) = self.nonces.compare_and_advance(&plan.claims) {
            warn!(error = %e, "Nonces moved during verification");
            return Err(e);
        }

        Ok(identities
            .into_iter()
            .zip(plan.item_nonces)
            .map(|(identity, nonce)| Authorized {
                identity: identity.public_key_hash,
                wallet: identity.wallet,
                nonce,
                next_nonce: nonce + U256::one(),
            })
            .collect())
    }

    /// Write new identities into both stores, all or none.
    ///
    /// Counters go in first. Requests resolve the registry before they
    /// snapshot nonces, so no request sees an identity without a counter.
    fn admit(&self, identities: &[Identity], nonce: U256) -> Result<(), AuthorizationError> {
        let entries: Vec<(PublicKeyHash, U256)> = identities
            .iter()
            .map(|identity| (identity.public_key_hash, nonce))
            .collect();
        self.nonces.initialize_all(&entries)?;
        if let Err(e) = self.registry.register_all(identities.to_vec()) {
            self.nonces.remove_all(entries.iter().map(|(hash, _)| hash));
            return Err(e);
        }
        Ok(())
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new(AuthorizationConfig::default())
    }
}

impl AuthorizationApi for Authorizer {
    fn chain_id(&self) -> U256 {
        self.config.chain_id
    }

    fn gateway_address(&self) -> Address {
        self.config.gateway_address
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }

    fn verify(
        &self,
        payload: &Payload,
        identity: &IdentityRef,
        signature: &BlsSignature,
    ) -> Result<Authorized, AuthorizationError> {
        let item = AuthorizationItem::new(payload.clone(), identity.clone());
        let mut authorized = self.authorize_items(std::slice::from_ref(&item), signature, Scheme::Single)?;
        let authorized = authorized
            .pop()
            .ok_or_else(|| AuthorizationError::malformed("empty authorization"))?;
        debug!(
            identity = %authorized.identity,
            nonce = %authorized.nonce,
            "Authorized operation"
        );
        Ok(authorized)
    }

    fn verify_batch(
        &self,
        items: &[AuthorizationItem],
        aggregate_signature: &BlsSignature,
    ) -> Result<BatchAuthorization, AuthorizationError> {
        let authorized = self.authorize_items(items, aggregate_signature, Scheme::Aggregate)?;
        info!(items = authorized.len(), "Authorized batch");
        Ok(BatchAuthorization { items: authorized })
    }

    fn check_signature(
        &self,
        payload: &Payload,
        identity: &IdentityRef,
        signature: &BlsSignature,
    ) -> Result<SignatureCheck, AuthorizationError> {
        let identity = self.registry.resolve(identity)?;
        let next_nonce = self
            .nonces
            .get(&identity.public_key_hash)
            .ok_or(AuthorizationError::UnknownIdentity(identity.public_key_hash))?;

        let valid = payload.chain_id == self.config.chain_id
            && verifier::check_signature(&identity.public_key, &payload.message(), signature).is_ok();

        Ok(SignatureCheck {
            valid,
            next_nonce,
            fresh: payload.nonce == next_nonce,
        })
    }

    fn create_wallets(
        &self,
        requests: &[CreateWalletRequest],
        aggregate_signature: &BlsSignature,
    ) -> Result<Vec<Identity>, AuthorizationError> {
        verifier::check_batch_size(requests.len(), self.config.max_batch_size)?;

        let identities: Vec<Identity> = requests
            .iter()
            .map(|request| Identity::for_key(request.public_key.clone()))
            .collect();
        for identity in &identities {
            if self.registry.contains(&identity.public_key_hash) {
                return Err(AuthorizationError::IdentityExists(identity.public_key_hash));
            }
        }

        let payloads: Vec<Payload> = requests
            .iter()
            .zip(&identities)
            .map(|(request, identity)| self.creation_payload(&identity.public_key_hash, request.reward))
            .collect();
        let keyed: Vec<(&Payload, PublicKeyHash)> = payloads
            .iter()
            .zip(&identities)
            .map(|(payload, identity)| (payload, identity.public_key_hash))
            .collect();
        verifier::check_distinct(&keyed)?;

        let payload_refs: Vec<&Payload> = payloads.iter().collect();
        let messages = verifier::signed_messages(&payload_refs);
        let checked = verifier::validate_keys(&identities).and_then(|()| {
            verifier::check_aggregate_signature(&messages, &identities, aggregate_signature)
        });
        if let Err(e) = checked {
            warn!(wallets = requests.len(), error = %e, "Rejected wallet creation");
            return Err(e);
        }

        self.admit(&identities, U256::one())?;

        for identity in &identities {
            info!(
                identity = %identity.public_key_hash,
                wallet = %hex::encode(identity.wallet),
                "Created wallet"
            );
        }
        Ok(identities)
    }

    fn register(
        &self,
        public_key: &BlsPublicKey,
        proof: &BlsSignature,
    ) -> Result<Identity, AuthorizationError> {
        let identity = Identity::for_key(public_key.clone());
        verifier::validate_keys(std::slice::from_ref(&identity))?;
        if !public_key.verify_possession(proof) {
            warn!(identity = %identity.public_key_hash, "Rejected proof of possession");
            return Err(AuthorizationError::SignatureInvalid);
        }
        self.admit(std::slice::from_ref(&identity), U256::zero())?;
        info!(
            identity = %identity.public_key_hash,
            wallet = %hex::encode(identity.wallet),
            "Registered wallet"
        );
        Ok(identity)
    }

    fn nonce_of(&self, identity: &IdentityRef) -> Result<U256, AuthorizationError> {
        let hash = identity.public_key_hash();
        self.nonces
            .get(&hash)
            .ok_or(AuthorizationError::UnknownIdentity(hash))
    }

    fn identity(&self, public_key_hash: &PublicKeyHash) -> Option<Identity> {
        self.registry.get(public_key_hash)
    }
}
