//! # Batch Dispatch Subsystem (BW-02)
//!
//! Accepts relayer batches, hands them to the authorizer as one aggregate
//! check, then executes each authorized operation as its wallet.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Execution calls, per-item results, stats
//! - **Ports Layer** (`ports/`): [`BatchSubmissionApi`] in, [`ExecutionGateway`] out
//! - **Service Layer** (`service.rs`): [`BatchDispatcher`]
//! - **Expander** (`expander.rs`): same-call, same-caller and wallet-creation shorthands
//!
//! ## Failure Model
//!
//! Authorization is atomic per batch. Execution is not: a reverted call leaves
//! its siblings untouched and its nonce consumed.

pub mod config;
pub mod domain;
pub mod expander;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::DispatcherConfig;
pub use domain::entities::{
    BatchSubmission, CallOutcome, CallResult, DispatchStats, ExecutionCall, ExecutionFailure,
};
pub use domain::errors::DispatchError;
pub use ports::inbound::BatchSubmissionApi;
pub use ports::outbound::{ExecutionError, ExecutionGateway};
pub use service::BatchDispatcher;
