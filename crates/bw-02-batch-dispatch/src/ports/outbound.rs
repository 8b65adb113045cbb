//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{CallOutcome, ExecutionCall};
use thiserror::Error;

/// Error from the execution gateway.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The executor is not reachable
    #[error("Execution gateway unavailable: {0}")]
    Unavailable(String),

    /// The executor refused the call without running it
    #[error("Call rejected: {reason}")]
    Rejected { reason: String },
}

/// Runs authorized calls as their wallet.
#[async_trait::async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Apply one call.
    ///
    /// A call that runs and reverts is `Ok` with `success == false`.
    ///
    /// # Errors
    /// * `ExecutionError::Unavailable` - Executor unreachable
    /// * `ExecutionError::Rejected` - Executor refused the call
    async fn apply_call(&self, call: ExecutionCall) -> Result<CallOutcome, ExecutionError>;
}
