//! # Ports Layer
//!
//! - **Inbound (Driving)**: batch submission API used by relayers
//! - **Outbound (Driven)**: the chain-side executor of authorized calls

pub mod inbound;
pub mod outbound;
