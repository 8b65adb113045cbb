//! Fuzz target for signed-message decoding.
//!
//! Arbitrary bytes either fail to decode or decode to a payload that
//! re-encodes to the same bytes.

#![no_main]

use bw_01_authorization::decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = decode(data) {
        assert_eq!(&payload.message().as_bytes()[..], data);
    }
});
