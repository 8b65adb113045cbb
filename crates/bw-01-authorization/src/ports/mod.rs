//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that relayers and the dispatcher call
//!
//! Authorization has no driven dependencies; its state lives in-process.

pub mod inbound;
