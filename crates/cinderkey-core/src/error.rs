//! Error types for keyring operations.
//!
//! One flat taxonomy covers key creation, wrapping, and persistence. Cipher
//! and padding failures from `cinderkey-crypto` are carried over unchanged in
//! meaning via `From<TransformError>`.

use cinderkey_crypto::TransformError;
use thiserror::Error;

/// Errors returned by [`crate::Key`], [`crate::Keyring`], and the codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    /// Key creation attempted with an empty id
    #[error("invalid identifier: key id must not be empty")]
    InvalidIdentifier,

    /// The key generator failed
    #[error("key generation failed: {reason}")]
    GenerationFailure {
        /// Error reported by the generator
        reason: String,
    },

    /// Secure randomness for the IV could not be obtained
    #[error("randomness unavailable: {reason}")]
    RandomnessFailure {
        /// Error reported by the entropy source
        reason: String,
    },

    /// Ciphertext shorter than one block or not block aligned
    #[error("malformed ciphertext: {len} bytes with block size {block_size}")]
    MalformedCiphertext {
        /// Ciphertext length including the IV
        len: usize,
        /// Block size of the master cipher
        block_size: usize,
    },

    /// Padding was invalid after decryption
    #[error("invalid padding: {reason}")]
    InvalidPadding {
        /// What was wrong with the padding
        reason: &'static str,
    },

    /// Master cipher reported a block size outside `1..=255`
    #[error("invalid block size: {size}")]
    InvalidBlockSize {
        /// Reported block size
        size: usize,
    },

    /// A key or keyring record could not be encoded or decoded
    #[error("serialization failed: {reason}")]
    SerializationFailure {
        /// What went wrong
        reason: String,
    },
}

impl KeyringError {
    /// Returns true if this error may succeed on retry.
    ///
    /// Randomness failure is the only transient case. Everything else is
    /// determined by the inputs.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RandomnessFailure { .. })
    }

    pub(crate) fn serialization(reason: impl std::fmt::Display) -> Self {
        Self::SerializationFailure { reason: reason.to_string() }
    }
}

impl From<TransformError> for KeyringError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::InvalidBlockSize { size } => Self::InvalidBlockSize { size },
            TransformError::Randomness { reason } => Self::RandomnessFailure { reason },
            TransformError::MalformedCiphertext { len, block_size } => {
                Self::MalformedCiphertext { len, block_size }
            },
            TransformError::MisalignedPlaintext { .. } => {
                Self::InvalidPadding { reason: "plaintext is not block aligned" }
            },
            TransformError::InvalidPadding { reason } => Self::InvalidPadding { reason },
        }
    }
}
