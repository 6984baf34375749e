//! Master cipher collaborator
//!
//! The keyring never sees the master key. Callers hand over a block cipher
//! that is already keyed, and the transform drives it one block at a time.

use std::num::NonZeroU8;

use cipher::{Block, BlockDecrypt, BlockEncrypt, BlockSizeUser};

use crate::error::TransformError;

/// An already-keyed block cipher used to wrap secondary keys.
///
/// Implemented for every RustCrypto block cipher (`aes::Aes256` and friends),
/// so callers normally pass one of those directly.
///
/// # Invariants
///
/// - `encrypt_block` and `decrypt_block` are only ever called with slices of
///   exactly `block_size()` bytes
/// - `decrypt_block` inverts `encrypt_block`
pub trait MasterCipher {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypt one block in place.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypt one block in place.
    fn decrypt_block(&self, block: &mut [u8]);
}

impl<C> MasterCipher for C
where
    C: BlockEncrypt + BlockDecrypt,
{
    fn block_size(&self) -> usize {
        <C as BlockSizeUser>::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        BlockEncrypt::encrypt_block(self, Block::<C>::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        BlockDecrypt::decrypt_block(self, Block::<C>::from_mut_slice(block));
    }
}

/// Block size usable with PKCS#7 padding.
///
/// The pad length is stored in a single byte, so only sizes in `1..=255`
/// are representable. Holding a `BlockSize` means that check already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize(NonZeroU8);

impl BlockSize {
    /// 128-bit block (AES).
    pub const AES: Self = match NonZeroU8::new(16) {
        Some(size) => Self(size),
        None => unreachable!(),
    };

    /// Validate a raw block size.
    ///
    /// Returns `None` for 0 and anything above 255.
    pub fn new(size: usize) -> Option<Self> {
        u8::try_from(size).ok().and_then(NonZeroU8::new).map(Self)
    }

    /// Block size reported by a master cipher.
    pub fn of<C: MasterCipher + ?Sized>(cipher: &C) -> Result<Self, TransformError> {
        let size = cipher.block_size();
        Self::new(size).ok_or(TransformError::InvalidBlockSize { size })
    }

    /// Size in bytes.
    pub fn get(self) -> usize {
        usize::from(self.0.get())
    }
}
