//! Byte order of stored words
//!
//! Streams persist `u32` words little-endian regardless of host order.

use super::constants::WORD_BYTES;
use crate::validation::validate_u32_array_size;
use crate::{PackError, Result};

/// Decode little-endian bytes into `out`, returning the words written
///
/// `bytes` must be a whole number of words and fit in `out`.
pub fn words_from_le_bytes(bytes: &[u8], out: &mut [u32]) -> Result<usize> {
    let count = validate_u32_array_size(bytes.len())?;
    let out = out.get_mut(..count).ok_or(PackError::InsufficientBuffer)?;
    bytemuck::cast_slice_mut::<u32, u8>(out).copy_from_slice(bytes);
    for word in out.iter_mut() {
        *word = u32::from_le(*word);
    }
    Ok(count)
}

/// Encode `words` little-endian into `out`, returning the bytes written
pub fn words_to_le_bytes(words: &[u32], out: &mut [u8]) -> Result<usize> {
    let len = words
        .len()
        .checked_mul(WORD_BYTES)
        .ok_or(PackError::ArraySizeOverflow)?;
    let out = out.get_mut(..len).ok_or(PackError::InsufficientBuffer)?;
    for (chunk, word) in out.chunks_exact_mut(WORD_BYTES).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_layout() {
        let mut bytes = [0u8; 8];
        assert_eq!(words_to_le_bytes(&[0x0403_0201, 0xdead_beef], &mut bytes), Ok(8));
        assert_eq!(bytes, [1, 2, 3, 4, 0xef, 0xbe, 0xad, 0xde]);

        let mut words = [0u32; 2];
        assert_eq!(words_from_le_bytes(&bytes, &mut words), Ok(2));
        assert_eq!(words, [0x0403_0201, 0xdead_beef]);
    }

    #[test]
    fn test_rejects_partial_words() {
        let mut words = [0u32; 4];
        assert_eq!(
            words_from_le_bytes(&[1, 2, 3], &mut words),
            Err(PackError::ArrayAlignment)
        );
    }

    #[test]
    fn test_rejects_small_buffers() {
        let mut words = [0u32; 1];
        assert_eq!(
            words_from_le_bytes(&[0u8; 8], &mut words),
            Err(PackError::InsufficientBuffer)
        );
        let mut bytes = [0u8; 3];
        assert_eq!(
            words_to_le_bytes(&[1], &mut bytes),
            Err(PackError::InsufficientBuffer)
        );
    }
}
