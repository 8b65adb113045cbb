//! # Dispatch Errors

use bw_01_authorization::AuthorizationError;
use thiserror::Error;

/// Errors that reject a whole submission before anything executes.
///
/// Failures of individual calls after authorization are reported per item
/// in [`CallResult`](super::entities::CallResult) instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Shape problems: list lengths, call-data size, call-data hash
    #[error("Malformed submission: {0}")]
    MalformedInput(String),
}
