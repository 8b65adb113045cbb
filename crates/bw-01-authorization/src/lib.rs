//! # Authorization Subsystem (BW-01)
//!
//! Decides whether wallet operations may run. An operation is a signed
//! [`Payload`]; many operations from many wallets travel under one aggregate
//! BLS signature.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Payload codec, identity and nonce stores, verification rules
//! - **Ports Layer** (`ports/`): The inbound [`AuthorizationApi`]
//! - **Service Layer** (`service.rs`): [`Authorizer`], wiring the rules to the stores
//!
//! ## Replay Protection
//!
//! - Each wallet has a 256-bit nonce; an accepted operation consumes exactly one
//! - A batch consumes all of its nonces or none of them
//! - Every payload commits to the chain id

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::AuthorizationConfig;
pub use domain::entities::{
    AuthorizationItem, AuthorizationOutcome, AuthorizationRequest, Authorized,
    BatchAuthorization, CreateWalletRequest, Identity, IdentityRef, SignatureCheck,
};
pub use domain::errors::{AuthorizationError, ConfigError};
pub use domain::identity::{derive_wallet_address, IdentityRegistry};
pub use domain::nonce::{NonceClaim, NonceStore};
pub use domain::payload::{
    decode, domain_separator, encode, hash_call_data, sign_message, wallet_cross_check_call_data,
    Payload, SignedMessage, SIGNED_MESSAGE_LEN,
};
pub use ports::inbound::AuthorizationApi;
pub use service::Authorizer;
