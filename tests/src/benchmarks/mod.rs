//! # BLS Wallet Benchmarks
//!
//! Benchmark bodies, registered with criterion in `benches/`.

pub mod bw_01_authorization;
