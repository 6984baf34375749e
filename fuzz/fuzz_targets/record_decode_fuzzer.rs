//! Fuzz target for key and keyring decoding
//!
//! # Strategy
//!
//! - Random bytes: arbitrary input to every decoder in both formats
//! - Wrapped: random bytes nested inside a well-formed keyring container,
//!   so the per-key decoder sees them after the outer layer succeeds
//!
//! # Invariants
//!
//! - NEVER panic on malformed input
//! - A decoded key always has a non-empty id and a known status
//! - A decoded key re-encodes and decodes to the same record

#![no_main]

use arbitrary::Arbitrary;
use cinderkey_core::{Cbor, Codec, Json, Key, KeyStatus, Keyring, RingRecord};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    RandomBytes { bytes: Vec<u8> },
    Wrapped { records: Vec<Vec<u8>> },
}

fuzz_target!(|input: Input| {
    match input {
        Input::RandomBytes { bytes } => {
            check_key::<Cbor>(&bytes);
            check_key::<Json>(&bytes);
            let _ = Keyring::restore_all::<Cbor>(&bytes);
            let _ = Keyring::restore_all::<Json>(&bytes);
        },
        Input::Wrapped { records } => {
            for record in &records {
                check_key::<Cbor>(record);
                check_key::<Json>(record);
            }
            let ring = RingRecord { keys: records };
            check_ring::<Cbor>(&ring);
            check_ring::<Json>(&ring);
        },
    }
});

fn check_key<F: Codec>(bytes: &[u8]) {
    let Ok(key) = Key::deserialize::<F>(bytes) else {
        return;
    };

    assert!(!key.id().is_empty());
    assert!(matches!(key.status(), KeyStatus::New | KeyStatus::Used | KeyStatus::Disabled));

    let again = Key::deserialize::<F>(&key.serialize::<F>().expect("decoded key re-encodes"))
        .expect("re-encoded key decodes");
    assert_eq!(again.record(), key.record());
}

fn check_ring<F: Codec>(ring: &RingRecord) {
    let Ok(bytes) = F::encode_ring(ring) else {
        return;
    };
    if let Ok(restored) = Keyring::restore_all::<F>(&bytes) {
        assert!(restored.len() <= ring.keys.len());
    }
}
