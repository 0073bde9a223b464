//! Array bounds validation for stored integer streams
//!
//! Pure arithmetic on byte lengths with overflow protection; no I/O.

use crate::PackError;

/// Validate that `byte_len` describes a whole array of `T`
///
/// Returns the element count.
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize, PackError> {
    let element_size = core::mem::size_of::<T>();

    if byte_len % element_size != 0 {
        return Err(PackError::ArrayAlignment);
    }

    let count = byte_len / element_size;

    // Leave headroom for downstream offset arithmetic
    if count > usize::MAX / 8 {
        return Err(PackError::ArraySizeOverflow);
    }

    Ok(count)
}

/// Validate a byte length holding stored `u32` words
pub const fn validate_u32_array_size(byte_len: usize) -> Result<usize, PackError> {
    validate_array_bounds::<u32>(byte_len)
}
