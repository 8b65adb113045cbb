//! # BLS Wallet Authorization Benchmarks
//!
//! | Area | What is measured |
//! |------|------------------|
//! | Codec | Payload encoding |
//! | Signer | Sign / verify one payload |
//! | Aggregator | One pairing check over N pairs |
//! | Authorizer | `verify_batch` with nonce compare-and-advance |

use bw_tests::benchmarks::bw_01_authorization::{
    bench_aggregate_verify, bench_sign_and_verify, bench_verify_batch,
};
use criterion::{criterion_group, criterion_main};

criterion_group!(
    authorization,
    bench_sign_and_verify,
    bench_aggregate_verify,
    bench_verify_batch
);
criterion_main!(authorization);
