//! Fuzz target for the CBC key-wrapping pipeline
//!
//! # Strategy
//!
//! - Roundtrip: pad, encrypt, decrypt, unpad arbitrary secrets
//! - Corruption: flip arbitrary ciphertext bytes before decrypting
//! - Raw: decrypt arbitrary bytes as if they were stored ciphertext
//!
//! # Invariants
//!
//! - Roundtrip always recovers the secret
//! - Corrupted or raw input returns an error or garbage, NEVER panics

#![no_main]

use aes::{Aes128, cipher::KeyInit};
use arbitrary::Arbitrary;
use cinderkey_crypto::{BlockSize, OsEntropy, decrypt, encrypt, pad, unpad};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    Roundtrip { master: [u8; 16], secret: Vec<u8> },
    Corruption { master: [u8; 16], secret: Vec<u8>, flips: Vec<(u16, u8)> },
    Raw { master: [u8; 16], bytes: Vec<u8> },
}

fuzz_target!(|input: Input| {
    match input {
        Input::Roundtrip { master, secret } => {
            let cipher = Aes128::new(&master.into());
            let wrapped = encrypt(&cipher, &pad(&secret, BlockSize::AES), &OsEntropy)
                .expect("aligned plaintext encrypts");
            let padded = decrypt(&cipher, &wrapped).expect("own ciphertext decrypts");
            assert_eq!(unpad(&padded, BlockSize::AES).expect("own padding strips"), secret);
        },
        Input::Corruption { master, secret, flips } => {
            let cipher = Aes128::new(&master.into());
            let mut wrapped = encrypt(&cipher, &pad(&secret, BlockSize::AES), &OsEntropy)
                .expect("aligned plaintext encrypts");
            let len = wrapped.len();
            for (at, mask) in flips {
                wrapped[usize::from(at) % len] ^= mask;
            }
            if let Ok(padded) = decrypt(&cipher, &wrapped) {
                let _ = unpad(&padded, BlockSize::AES);
            }
        },
        Input::Raw { master, bytes } => {
            let cipher = Aes128::new(&master.into());
            if let Ok(padded) = decrypt(&cipher, &bytes) {
                let _ = unpad(&padded, BlockSize::AES);
            }
        },
    }
});
