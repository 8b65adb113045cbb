//! # BW-01 Authorization Benchmarks
//!
//! - Signing and single verification
//! - Aggregate pairing check as the batch grows
//! - Full `verify_batch` including nonce bookkeeping
//! - Payload encoding

use bw_01_authorization::{
    AuthorizationApi, AuthorizationConfig, AuthorizationItem, Authorizer, Payload,
};
use criterion::{black_box, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_crypto::{aggregate_signatures, verify_aggregate, BlsKeyPair, BlsSignature};
use shared_types::U256;
use std::time::Duration;

const BATCH_SIZES: [usize; 4] = [1, 8, 32, 128];

/// Random call data of `size` bytes
fn random_call_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn payload(nonce: u64, call_data: &[u8]) -> Payload {
    Payload::new(
        U256::from(31337),
        U256::from(nonce),
        U256::zero(),
        U256::zero(),
        [0x70; 20],
        call_data,
    )
}

/// Keys, payloads and their aggregate signature.
fn signed_batch(size: usize) -> (Vec<BlsKeyPair>, Vec<Payload>, BlsSignature) {
    let keys: Vec<BlsKeyPair> = (0..size).map(|_| BlsKeyPair::generate()).collect();
    let payloads: Vec<Payload> = (0..size).map(|_| payload(0, &random_call_data(68))).collect();
    let signatures: Vec<BlsSignature> = keys
        .iter()
        .zip(&payloads)
        .map(|(key, payload)| payload.sign(key))
        .collect();
    let aggregate = aggregate_signatures(&signatures).expect("non-empty batch");
    (keys, payloads, aggregate)
}

pub fn bench_sign_and_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-01/single");
    let key = BlsKeyPair::generate();
    let payload = payload(0, &random_call_data(68));
    let message = payload.message();
    let signature = payload.sign(&key);

    group.bench_function("encode", |b| b.iter(|| black_box(payload.message())));
    group.bench_function("sign", |b| b.iter(|| black_box(key.sign(message.as_bytes()))));
    group.bench_function("verify", |b| {
        b.iter(|| black_box(key.public_key().verify(message.as_bytes(), &signature)))
    });
    group.finish();
}

pub fn bench_aggregate_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-01/aggregate_verify");
    group.measurement_time(Duration::from_secs(10));

    for size in BATCH_SIZES {
        let (keys, payloads, aggregate) = signed_batch(size);
        let messages: Vec<_> = payloads.iter().map(Payload::message).collect();
        let pairs: Vec<(&[u8], _)> = messages
            .iter()
            .zip(&keys)
            .map(|(message, key)| (&message.as_bytes()[..], key.public_key()))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pairs, |b, pairs| {
            b.iter(|| black_box(verify_aggregate(&aggregate, pairs)))
        });
    }
    group.finish();
}

pub fn bench_verify_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-01/verify_batch");
    group.measurement_time(Duration::from_secs(10));

    for size in BATCH_SIZES {
        let (keys, payloads, aggregate) = signed_batch(size);
        let proofs: Vec<BlsSignature> = keys.iter().map(BlsKeyPair::prove_possession).collect();
        let items: Vec<AuthorizationItem> = payloads
            .iter()
            .zip(&keys)
            .map(|(payload, key)| AuthorizationItem::new(payload.clone(), key.public_key_hash()))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            // Each accepted batch consumes its nonces, so every iteration gets
            // a freshly registered authorizer.
            b.iter_batched(
                || {
                    let authorizer = Authorizer::new(AuthorizationConfig::default());
                    for (key, proof) in keys.iter().zip(&proofs) {
                        authorizer.register(key.public_key(), proof).expect("fresh key");
                    }
                    authorizer
                },
                |authorizer| black_box(authorizer.verify_batch(items, &aggregate)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}
