//! CBC-mode wrapping under the master cipher
//!
//! Output layout is `IV ‖ C_1 ‖ … ‖ C_n`, where the IV is exactly one block
//! of fresh randomness. Inputs are never mutated; decryption works on a
//! private, zeroize-on-drop copy.

use zeroize::Zeroizing;

use crate::{
    entropy::Entropy,
    error::TransformError,
    master::{BlockSize, MasterCipher},
};

/// CBC-encrypt already padded plaintext under a fresh random IV.
///
/// Returns `IV ‖ ciphertext`, `block_size + padded.len()` bytes long.
///
/// # Errors
///
/// - `Randomness`: the entropy source could not produce an IV
/// - `MisalignedPlaintext`: `padded` is not a multiple of the block size
/// - `InvalidBlockSize`: the cipher reports an unusable block size
pub fn encrypt<C, E>(cipher: &C, padded: &[u8], entropy: &E) -> Result<Vec<u8>, TransformError>
where
    C: MasterCipher + ?Sized,
    E: Entropy + ?Sized,
{
    let size = BlockSize::of(cipher)?.get();
    if padded.len() % size != 0 {
        return Err(TransformError::MisalignedPlaintext { len: padded.len(), block_size: size });
    }

    let mut out = vec![0u8; size + padded.len()];
    let (iv, body) = out.split_at_mut(size);
    entropy.fill(iv)?;
    body.copy_from_slice(padded);

    let mut chain = iv.to_vec();
    for block in body.chunks_exact_mut(size) {
        xor_in_place(block, &chain);
        cipher.encrypt_block(block);
        chain.copy_from_slice(block);
    }

    Ok(out)
}

/// CBC-decrypt `IV ‖ ciphertext`, returning the still-padded plaintext.
///
/// Callers strip the padding with [`crate::unpad`]. Input of exactly one
/// block decrypts to an empty buffer, which `unpad` then rejects.
///
/// # Errors
///
/// - `MalformedCiphertext`: shorter than one block, or not block aligned
/// - `InvalidBlockSize`: the cipher reports an unusable block size
pub fn decrypt<C>(cipher: &C, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError>
where
    C: MasterCipher + ?Sized,
{
    let size = BlockSize::of(cipher)?.get();
    if data.len() < size || data.len() % size != 0 {
        return Err(TransformError::MalformedCiphertext { len: data.len(), block_size: size });
    }

    let (iv, body) = data.split_at(size);
    let mut plain = Zeroizing::new(body.to_vec());

    let mut chain = iv;
    for (block, ciphertext) in plain.chunks_exact_mut(size).zip(body.chunks_exact(size)) {
        cipher.decrypt_block(block);
        xor_in_place(block, chain);
        chain = ciphertext;
    }

    Ok(plain)
}

fn xor_in_place(block: &mut [u8], mask: &[u8]) {
    debug_assert_eq!(block.len(), mask.len());
    for (b, m) in block.iter_mut().zip(mask) {
        *b ^= m;
    }
}
