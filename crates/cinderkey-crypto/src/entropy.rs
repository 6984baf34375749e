//! Randomness for IVs and generated keys.
//!
//! Production code uses [`OsEntropy`]. Tests substitute their own source to
//! pin IVs or to exercise the failure path.

use crate::error::TransformError;

/// Length of a generated secondary key (256 bits).
pub const DEFAULT_KEY_LEN: usize = 32;

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST draw from a CSPRNG
/// - Safe to call from many threads at once
pub trait Entropy: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), TransformError>;
}

/// OS randomness via getrandom (e.g. `getrandom(2)` on Linux).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), TransformError> {
        getrandom::fill(buf).map_err(|e| TransformError::Randomness { reason: e.to_string() })
    }
}

/// Generate `len` random bytes of key material from the OS.
///
/// Suitable as the keyring's generator: `|| random_key(DEFAULT_KEY_LEN)`.
pub fn random_key(len: usize) -> Result<Vec<u8>, TransformError> {
    let mut key = vec![0u8; len];
    OsEntropy.fill(&mut key)?;
    Ok(key)
}
