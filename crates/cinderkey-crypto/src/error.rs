//! Error types for the padding and block-cipher transform

use thiserror::Error;

/// Errors from padding, IV generation, and CBC operations.
///
/// All variants except [`TransformError::Randomness`] are deterministic in
/// their input: retrying the same call fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Cipher reported a block size that cannot carry PKCS#7 padding
    #[error("invalid block size: {size} (must be 1..=255)")]
    InvalidBlockSize {
        /// Block size reported by the cipher
        size: usize,
    },

    /// Secure randomness could not be obtained
    #[error("randomness unavailable: {reason}")]
    Randomness {
        /// Reason reported by the entropy source
        reason: String,
    },

    /// Ciphertext shorter than one block or not block aligned
    #[error("malformed ciphertext: {len} bytes with block size {block_size}")]
    MalformedCiphertext {
        /// Total ciphertext length including the IV
        len: usize,
        /// Block size of the cipher
        block_size: usize,
    },

    /// Plaintext handed to `encrypt` was not padded to the block size
    #[error("plaintext of {len} bytes is not aligned to block size {block_size}")]
    MisalignedPlaintext {
        /// Plaintext length
        len: usize,
        /// Block size of the cipher
        block_size: usize,
    },

    /// Padding could not be stripped
    #[error("invalid padding: {reason}")]
    InvalidPadding {
        /// What was wrong with the padded input
        reason: &'static str,
    },
}

impl TransformError {
    /// Returns true if this error may succeed on retry.
    ///
    /// Only entropy exhaustion is transient. Padding and ciphertext errors
    /// are a property of the bytes and will fail again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Randomness { .. })
    }
}
