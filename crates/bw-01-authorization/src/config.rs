//! # Authorization Configuration

use shared_types::{Address, U256, ZERO_ADDRESS};
use tracing::info;

use crate::domain::errors::ConfigError;

/// Chain id of a local development node.
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// Placeholder gateway address used until one is configured.
pub const DEFAULT_GATEWAY_ADDRESS: Address = [
    0x0b, 0x15, 0x0a, 0x11, 0xe7, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x01,
];

/// Default upper bound on operations per aggregate.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 256;

/// Authorization configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationConfig {
    /// Chain every payload must be signed for
    pub chain_id: U256,
    /// Target of the wallet-creation payload
    pub gateway_address: Address,
    /// Maximum operations under one aggregate signature
    pub max_batch_size: usize,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            chain_id: U256::from(DEFAULT_CHAIN_ID),
            gateway_address: DEFAULT_GATEWAY_ADDRESS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl AuthorizationConfig {
    /// Create config for testing with a small batch limit.
    pub fn for_testing() -> Self {
        Self {
            max_batch_size: 32,
            ..Self::default()
        }
    }

    pub fn with_chain_id(mut self, chain_id: U256) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Defaults overridden by `BW_CHAIN_ID`, `BW_GATEWAY_ADDRESS` and
    /// `BW_MAX_BATCH_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("BW_CHAIN_ID") {
            config.chain_id = parse_u256(raw.trim()).ok_or_else(|| ConfigError::InvalidEnv {
                key: "BW_CHAIN_ID",
                reason: format!("not a decimal or 0x-hex integer: {raw}"),
            })?;
            info!(chain_id = %config.chain_id, "Loaded chain id from environment");
        }

        if let Some(raw) = lookup("BW_GATEWAY_ADDRESS") {
            let bytes = hex::decode(raw.trim().trim_start_matches("0x")).map_err(|e| {
                ConfigError::InvalidEnv {
                    key: "BW_GATEWAY_ADDRESS",
                    reason: e.to_string(),
                }
            })?;
            config.gateway_address =
                bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| ConfigError::InvalidEnv {
                        key: "BW_GATEWAY_ADDRESS",
                        reason: format!("must be 20 bytes (40 hex chars), got {}", bytes.len()),
                    })?;
            info!("Loaded gateway address from environment");
        }

        if let Some(raw) = lookup("BW_MAX_BATCH_SIZE") {
            config.max_batch_size = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "BW_MAX_BATCH_SIZE",
                reason: format!("not an integer: {raw}"),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.is_zero() {
            return Err(ConfigError::ZeroChainId);
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.gateway_address == ZERO_ADDRESS {
            return Err(ConfigError::ZeroGateway);
        }
        Ok(())
    }
}

fn parse_u256(raw: &str) -> Option<U256> {
    match raw.strip_prefix("0x") {
        Some(hex_digits) => U256::from_str_radix(hex_digits, 16).ok(),
        None => U256::from_dec_str(raw).ok(),
    }
}
