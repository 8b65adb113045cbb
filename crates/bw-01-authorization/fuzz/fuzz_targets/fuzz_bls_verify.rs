//! Fuzz target for signature verification over arbitrary points.
//!
//! Decoding must reject bad points without panicking, and verification of
//! whatever decodes must be deterministic.

#![no_main]

use bw_01_authorization::{hash_call_data, Payload};
use libfuzzer_sys::fuzz_target;
use shared_crypto::{verify_aggregate, BlsPublicKey, BlsSignature};

#[derive(Debug, arbitrary::Arbitrary)]
struct VerifyFuzzInput {
    nonce: u64,
    target: [u8; 20],
    call_data: Vec<u8>,
    /// 48 bytes for a compressed G1 point
    signature_bytes: [u8; 48],
    /// 96 bytes for a compressed G2 point
    pubkey_bytes: [u8; 96],
}

fuzz_target!(|input: VerifyFuzzInput| {
    let (Ok(signature), Ok(public_key)) = (
        BlsSignature::from_bytes(&input.signature_bytes),
        BlsPublicKey::from_bytes(&input.pubkey_bytes),
    ) else {
        return;
    };

    let payload = Payload {
        chain_id: 31337u64.into(),
        nonce: input.nonce.into(),
        reward: 0u64.into(),
        value: 0u64.into(),
        target: input.target,
        call_data_hash: hash_call_data(&input.call_data),
    };
    let message = payload.message();

    let single = public_key.verify(message.as_bytes(), &signature);
    let aggregate = verify_aggregate(&signature, &[(&message.as_bytes()[..], &public_key)]);
    assert_eq!(single, aggregate);
});
