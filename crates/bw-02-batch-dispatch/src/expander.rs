//! # Expander Flows
//!
//! Shorthand submissions that rebuild the full payload list from a compact
//! description. The payload builders are public so wallets can sign exactly
//! what the dispatcher will check.
//!
//! - **Same call**: many wallets, one target and call data, each at its own
//!   current nonce
//! - **Same caller**: one wallet, many calls, consecutive nonces
//! - **Wallet creation**: pass-through to the authorizer's bootstrap path

use bw_01_authorization::{
    AuthorizationApi, AuthorizationError, CreateWalletRequest, Identity, IdentityRef, Payload,
};
use shared_crypto::BlsSignature;
use shared_types::{Address, U256};
use tracing::info;

use crate::domain::entities::CallResult;
use crate::domain::errors::DispatchError;
use crate::ports::inbound::BatchSubmissionApi;
use crate::ports::outbound::ExecutionGateway;
use crate::service::BatchDispatcher;

fn check_lengths(what: &str, left: usize, right: usize) -> Result<(), DispatchError> {
    if left != right {
        return Err(DispatchError::MalformedInput(format!(
            "{left} {what} for {right} rewards"
        )));
    }
    Ok(())
}

impl<A: AuthorizationApi, G: ExecutionGateway> BatchDispatcher<A, G> {
    /// Payloads for `identities` all calling `target` with `call_data`.
    pub fn same_call_payloads(
        &self,
        identities: &[IdentityRef],
        rewards: &[U256],
        target: Address,
        call_data: &[u8],
    ) -> Result<Vec<Payload>, DispatchError> {
        check_lengths("identities", identities.len(), rewards.len())?;
        let authorizer = self.authorizer();
        identities
            .iter()
            .zip(rewards)
            .map(|(identity, reward)| -> Result<Payload, DispatchError> {
                let nonce = authorizer.nonce_of(identity)?;
                Ok(Payload::new(
                    authorizer.chain_id(),
                    nonce,
                    *reward,
                    U256::zero(),
                    target,
                    call_data,
                ))
            })
            .collect()
    }

    /// Payloads for one identity making `call_datas.len()` calls to `target`.
    pub fn same_caller_payloads(
        &self,
        identity: &IdentityRef,
        rewards: &[U256],
        target: Address,
        call_datas: &[Vec<u8>],
    ) -> Result<Vec<Payload>, DispatchError> {
        check_lengths("call datas", call_datas.len(), rewards.len())?;
        let authorizer = self.authorizer();
        let mut nonce = authorizer.nonce_of(identity)?;
        let mut payloads = Vec::with_capacity(call_datas.len());
        for (call_data, reward) in call_datas.iter().zip(rewards) {
            payloads.push(Payload::new(
                authorizer.chain_id(),
                nonce,
                *reward,
                U256::zero(),
                target,
                call_data,
            ));
            nonce = nonce
                .checked_add(U256::one())
                .ok_or(AuthorizationError::NonceOverflow(identity.public_key_hash()))?;
        }
        Ok(payloads)
    }

    /// Many wallets, same call.
    pub async fn submit_same_call(
        &self,
        identities: &[IdentityRef],
        aggregate_signature: &BlsSignature,
        rewards: &[U256],
        target: Address,
        call_data: &[u8],
    ) -> Result<Vec<CallResult>, DispatchError> {
        let payloads = self.same_call_payloads(identities, rewards, target, call_data)?;
        let call_datas = vec![call_data.to_vec(); payloads.len()];
        self.submit_batch(identities, &payloads, aggregate_signature, &call_datas)
            .await
    }

    /// One wallet, many calls (airdrop).
    pub async fn submit_same_caller(
        &self,
        identity: &IdentityRef,
        aggregate_signature: &BlsSignature,
        rewards: &[U256],
        target: Address,
        call_datas: &[Vec<u8>],
    ) -> Result<Vec<CallResult>, DispatchError> {
        let payloads = self.same_caller_payloads(identity, rewards, target, call_datas)?;
        let identities = vec![identity.clone(); payloads.len()];
        self.submit_batch(&identities, &payloads, aggregate_signature, call_datas)
            .await
    }

    /// Register new wallets under one aggregate signature.
    pub fn create_wallets(
        &self,
        requests: &[CreateWalletRequest],
        aggregate_signature: &BlsSignature,
    ) -> Result<Vec<Identity>, DispatchError> {
        let created = self.authorizer().create_wallets(requests, aggregate_signature)?;
        info!(wallets = created.len(), "Registered wallets");
        Ok(created)
    }
}
