//! # Batch Dispatch Service
//!
//! Application service implementing [`BatchSubmissionApi`].
//!
//! A submission goes through three gates before anything runs:
//! 1. Shape: list lengths agree, call data within limits
//! 2. Commitment: every call data hashes to its payload's `call_data_hash`
//! 3. Authorization: one aggregate check, consuming all nonces or none
//!
//! Authorized operations then execute one by one through the
//! [`ExecutionGateway`]. Execution failures are per item.

use bw_01_authorization::{AuthorizationApi, AuthorizationRequest, Authorized, IdentityRef, Payload};
use shared_crypto::BlsSignature;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::DispatcherConfig;
use crate::domain::entities::{CallResult, DispatchStats, ExecutionCall};
use crate::domain::errors::DispatchError;
use crate::ports::inbound::BatchSubmissionApi;
use crate::ports::outbound::ExecutionGateway;

/// The Batch Dispatcher.
pub struct BatchDispatcher<A: AuthorizationApi, G: ExecutionGateway> {
    config: DispatcherConfig,
    authorizer: Arc<A>,
    gateway: Arc<G>,
    stats: Arc<RwLock<DispatchStats>>,
}

impl<A: AuthorizationApi, G: ExecutionGateway> BatchDispatcher<A, G> {
    /// Create a dispatcher sharing `authorizer`'s nonce state.
    pub fn new(config: DispatcherConfig, authorizer: Arc<A>, gateway: G) -> Self {
        Self {
            config,
            authorizer,
            gateway: Arc::new(gateway),
            stats: Arc::new(RwLock::new(DispatchStats::default())),
        }
    }

    pub fn authorizer(&self) -> &Arc<A> {
        &self.authorizer
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Get current dispatch statistics.
    pub async fn stats(&self) -> DispatchStats {
        self.stats.read().await.clone()
    }

    fn check_call_data(&self, index: usize, payload: &Payload, call_data: &[u8]) -> Result<(), DispatchError> {
        if call_data.len() > self.config.max_call_data_len {
            return Err(DispatchError::MalformedInput(format!(
                "call data {index} is {} bytes, limit is {}",
                call_data.len(),
                self.config.max_call_data_len
            )));
        }
        if !payload.matches_call_data(call_data) {
            return Err(DispatchError::MalformedInput(format!(
                "call data {index} does not match its payload hash"
            )));
        }
        Ok(())
    }

    async fn reject(&self, error: DispatchError) -> DispatchError {
        warn!(error = %error, "Rejected submission");
        self.stats.write().await.batches_rejected += 1;
        error
    }

    /// Run authorized operations in order. Never fails as a whole.
    async fn execute(
        &self,
        authorized: Vec<Authorized>,
        payloads: &[Payload],
        call_datas: &[Vec<u8>],
    ) -> Vec<CallResult> {
        let mut results = Vec::with_capacity(authorized.len());
        for ((authorized, payload), call_data) in authorized.into_iter().zip(payloads).zip(call_datas) {
            let call = ExecutionCall {
                identity: authorized.identity,
                wallet: authorized.wallet,
                nonce: authorized.nonce,
                target: payload.target,
                call_data: call_data.clone(),
                value: payload.value,
                reward: payload.reward,
            };
            let result = match self.gateway.apply_call(call).await {
                Ok(outcome) => CallResult::from(outcome),
                Err(e) => {
                    warn!(identity = %authorized.identity, error = %e, "Gateway failed to apply call");
                    CallResult::gateway_failure(e.to_string())
                }
            };
            debug!(
                identity = %authorized.identity,
                nonce = %authorized.nonce,
                target = %hex::encode(payload.target),
                success = result.success,
                "Applied call"
            );
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.success).count() as u64;
        let mut stats = self.stats.write().await;
        stats.batches_accepted += 1;
        stats.calls_succeeded += succeeded;
        stats.calls_failed += results.len() as u64 - succeeded;
        results
    }
}

#[async_trait::async_trait]
impl<A: AuthorizationApi, G: ExecutionGateway> BatchSubmissionApi for BatchDispatcher<A, G> {
    #[instrument(skip_all, fields(items = payloads.len()))]
    async fn submit_batch(
        &self,
        identities: &[IdentityRef],
        payloads: &[Payload],
        aggregate_signature: &BlsSignature,
        call_datas: &[Vec<u8>],
    ) -> Result<Vec<CallResult>, DispatchError> {
        if payloads.is_empty() || identities.len() != payloads.len() || call_datas.len() != payloads.len() {
            let error = DispatchError::MalformedInput(format!(
                "{} identities, {} payloads, {} call datas",
                identities.len(),
                payloads.len(),
                call_datas.len()
            ));
            return Err(self.reject(error).await);
        }
        for (index, (payload, call_data)) in payloads.iter().zip(call_datas).enumerate() {
            if let Err(e) = self.check_call_data(index, payload, call_data) {
                return Err(self.reject(e).await);
            }
        }

        let batch = match self
            .authorizer
            .verify_batch_lists(payloads, identities, aggregate_signature)
        {
            Ok(batch) => batch,
            Err(e) => return Err(self.reject(e.into()).await),
        };
        info!(items = batch.len(), "Executing authorized batch");

        Ok(self.execute(batch.items, payloads, call_datas).await)
    }

    #[instrument(skip_all, fields(identity = %identity.public_key_hash()))]
    async fn submit_single(
        &self,
        identity: &IdentityRef,
        payload: &Payload,
        signature: &BlsSignature,
        call_data: &[u8],
    ) -> Result<CallResult, DispatchError> {
        if let Err(e) = self.check_call_data(0, payload, call_data) {
            return Err(self.reject(e).await);
        }

        let request = AuthorizationRequest::Single {
            payload: payload.clone(),
            identity: identity.clone(),
            signature: signature.clone(),
        };
        let authorized = match self.authorizer.authorize(&request) {
            Ok(outcome) => outcome.into_items(),
            Err(e) => return Err(self.reject(e.into()).await),
        };

        let mut results = self
            .execute(authorized, std::slice::from_ref(payload), &[call_data.to_vec()])
            .await;
        results
            .pop()
            .ok_or_else(|| DispatchError::MalformedInput("no result for single submission".into()))
    }
}
