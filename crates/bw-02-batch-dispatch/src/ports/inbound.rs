//! # Inbound Ports (Driving Ports / API)

use bw_01_authorization::{IdentityRef, Payload};
use shared_crypto::BlsSignature;

use crate::domain::entities::{BatchSubmission, CallResult};
use crate::domain::errors::DispatchError;

/// Batch submission API.
#[async_trait::async_trait]
pub trait BatchSubmissionApi: Send + Sync {
    /// Authorize a batch under one aggregate signature, then execute each
    /// operation in order.
    ///
    /// Authorization is all-or-nothing. Execution is per item: a failed call
    /// does not affect its siblings, and its nonce stays consumed.
    async fn submit_batch(
        &self,
        identities: &[IdentityRef],
        payloads: &[Payload],
        aggregate_signature: &BlsSignature,
        call_datas: &[Vec<u8>],
    ) -> Result<Vec<CallResult>, DispatchError>;

    /// Authorize and execute one operation under its own signature.
    async fn submit_single(
        &self,
        identity: &IdentityRef,
        payload: &Payload,
        signature: &BlsSignature,
        call_data: &[u8],
    ) -> Result<CallResult, DispatchError>;

    async fn submit(&self, submission: &BatchSubmission) -> Result<Vec<CallResult>, DispatchError> {
        self.submit_batch(
            &submission.identities,
            &submission.payloads,
            &submission.aggregate_signature,
            &submission.call_datas,
        )
        .await
    }
}
