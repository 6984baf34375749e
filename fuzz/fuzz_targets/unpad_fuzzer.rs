//! Fuzz target for padding removal
//!
//! Feeds arbitrary trailers and lengths to `unpad`.
//!
//! # Invariants
//!
//! - NEVER panic, whatever the trailer byte
//! - On success the result is a prefix of the input, shorter by 1..=block_size
//! - `unpad(pad(x)) == x` for any input

#![no_main]

use arbitrary::Arbitrary;
use cinderkey_crypto::{BlockSize, pad, unpad};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    block_size: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Some(bs) = BlockSize::new(usize::from(input.block_size)) else {
        return;
    };

    if let Ok(stripped) = unpad(&input.data, bs) {
        let removed = input.data.len() - stripped.len();
        assert!((1..=bs.get()).contains(&removed));
        assert_eq!(stripped, &input.data[..stripped.len()]);
    }

    let padded = pad(&input.data, bs);
    assert_eq!(padded.len() % bs.get(), 0);
    assert_eq!(unpad(&padded, bs).ok(), Some(input.data.as_slice()));
});
