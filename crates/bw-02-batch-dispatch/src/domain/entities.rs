//! # Dispatch Entities

use bw_01_authorization::{IdentityRef, Payload};
use serde::{Deserialize, Serialize};
use shared_crypto::BlsSignature;
use shared_types::{Address, PublicKeyHash, U256};

/// One authorized operation, handed to the execution gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCall {
    pub identity: PublicKeyHash,
    /// Wallet the call runs as
    pub wallet: Address,
    pub nonce: U256,
    pub target: Address,
    pub call_data: Vec<u8>,
    pub value: U256,
    pub reward: U256,
}

/// What the gateway reports for a call that reached the chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    pub fn success(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    pub fn revert(return_data: Vec<u8>) -> Self {
        Self {
            success: false,
            return_data,
        }
    }
}

/// Why an authorized operation did not take effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionFailure {
    /// The call ran and reverted
    Reverted,
    /// The gateway could not run the call
    Gateway(String),
}

/// Per-operation result, in submission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub success: bool,
    pub return_data: Vec<u8>,
    pub failure: Option<ExecutionFailure>,
}

impl CallResult {
    pub fn succeeded(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
            failure: None,
        }
    }

    pub fn reverted(return_data: Vec<u8>) -> Self {
        Self {
            success: false,
            return_data,
            failure: Some(ExecutionFailure::Reverted),
        }
    }

    pub fn gateway_failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            return_data: Vec::new(),
            failure: Some(ExecutionFailure::Gateway(reason.into())),
        }
    }
}

impl From<CallOutcome> for CallResult {
    fn from(outcome: CallOutcome) -> Self {
        if outcome.success {
            Self::succeeded(outcome.return_data)
        } else {
            Self::reverted(outcome.return_data)
        }
    }
}

/// A relayer's batch as it arrives on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSubmission {
    pub identities: Vec<IdentityRef>,
    pub payloads: Vec<Payload>,
    pub aggregate_signature: BlsSignature,
    pub call_datas: Vec<Vec<u8>>,
}

/// Counters kept by the dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Batches that passed authorization
    pub batches_accepted: u64,
    /// Batches rejected before execution
    pub batches_rejected: u64,
    pub calls_succeeded: u64,
    /// Reverted or gateway-failed calls
    pub calls_failed: u64,
}
