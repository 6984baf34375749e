//! Cinderkey Cryptographic Primitives
//!
//! Building blocks for wrapping secondary key material under a caller-owned
//! master block cipher. Everything here is stateless: functions take the
//! cipher, the bytes, and (when encrypting) a source of randomness.
//!
//! # Key Wrapping
//!
//! A raw secondary key never leaves this crate in the clear unless the caller
//! asked for it. Writing a key pads it to the cipher's block boundary and
//! encrypts it in CBC mode under a freshly drawn IV:
//!
//! ```text
//! Raw key bytes
//!        │
//!        ▼ pad (PKCS#7, always 1..=block_size bytes)
//! Padded plaintext
//!        │
//!        ▼ CBC encrypt under master cipher, random IV
//! IV ‖ Ciphertext
//! ```
//!
//! Reading reverses the pipeline: split off the IV, CBC-decrypt, strip the
//! padding.
//!
//! # Security
//!
//! Confidentiality only:
//! - There is no integrity tag. Tampered ciphertext either fails `unpad` or
//!   decrypts to garbage; callers needing authenticity must add it above.
//! - The IV is redrawn on every encryption, so wrapping the same key twice
//!   never yields the same bytes.
//! - Decrypted buffers are returned as [`zeroize::Zeroizing`] so transient
//!   plaintext is wiped on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cbc;
pub mod entropy;
pub mod error;
pub mod master;
pub mod padding;

pub use cbc::{decrypt, encrypt};
pub use entropy::{DEFAULT_KEY_LEN, Entropy, OsEntropy, random_key};
pub use error::TransformError;
pub use master::{BlockSize, MasterCipher};
pub use padding::{pad, unpad};
