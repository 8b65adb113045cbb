//! # Shared Types Crate
//!
//! Value types shared across the BLS Wallet workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every cross-crate value type is defined here.
//! - **Fixed Width**: Addresses and hashes are plain byte arrays so they can be
//!   packed into the signed-message layout without conversion.

pub mod entities;

pub use entities::*;
