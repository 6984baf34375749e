//! PKCS#7 padding
//!
//! Padding is unconditional: input that already ends on a block boundary
//! still gains a full block. That keeps `unpad` unambiguous.

use crate::{error::TransformError, master::BlockSize};

/// Pad `data` to a multiple of `block_size`.
///
/// Appends `n` bytes of value `n`, where `n = block_size - len % block_size`.
/// `n` is always in `1..=block_size`.
pub fn pad(data: &[u8], block_size: BlockSize) -> Vec<u8> {
    let size = block_size.get();
    let fill = size - data.len() % size;

    let mut padded = Vec::with_capacity(data.len() + fill);
    padded.extend_from_slice(data);
    // fill <= 255 because BlockSize fits in a u8
    padded.resize(data.len() + fill, fill as u8);

    debug_assert_eq!(padded.len() % size, 0);
    padded
}

/// Strip padding added by [`pad`].
///
/// Only the final byte is consulted for the pad length.
///
/// # Errors
///
/// - `InvalidPadding`: input is empty, not block aligned, has a pad length of
///   zero or above `block_size`, or would unpad to a negative length
pub fn unpad(padded: &[u8], block_size: BlockSize) -> Result<&[u8], TransformError> {
    let size = block_size.get();

    let Some(&last) = padded.last() else {
        return Err(TransformError::InvalidPadding { reason: "empty input" });
    };

    if padded.len() % size != 0 {
        return Err(TransformError::InvalidPadding {
            reason: "length not a multiple of block size",
        });
    }

    let fill = usize::from(last);
    if fill == 0 || fill > size {
        return Err(TransformError::InvalidPadding { reason: "pad length out of range" });
    }

    let Some(len) = padded.len().checked_sub(fill) else {
        return Err(TransformError::InvalidPadding { reason: "pad length exceeds input" });
    };

    Ok(&padded[..len])
}
