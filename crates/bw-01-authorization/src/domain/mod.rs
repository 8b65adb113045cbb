//! # Domain Layer
//!
//! Payload encoding, identity and nonce state, and the verification rules.
//! No I/O.

pub mod entities;
pub mod errors;
pub mod identity;
pub mod nonce;
pub mod payload;
pub mod verifier;
