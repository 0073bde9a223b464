//! Column and block layout rules
//!
//! Every column is split into blocks of [`BLOCK_SIZE`] entries, the last one
//! possibly shorter. Blocks never cross column boundaries, so a column's block
//! count depends only on its entry count.

use crate::bitpack::BLOCK_SIZE;
use crate::PackError;

/// Blocks needed to hold `count` entries
pub const fn blocks_for_count(count: u32) -> u32 {
    count.div_ceil(BLOCK_SIZE as u32)
}

/// Length of the block at `block` (0-based) within a column of `count` entries
pub const fn block_len(count: u32, block: u32) -> usize {
    let start = block as usize * BLOCK_SIZE;
    let count = count as usize;
    if start >= count {
        0
    } else if count - start < BLOCK_SIZE {
        count - start
    } else {
        BLOCK_SIZE
    }
}

/// Check a column's block span `[start, end)` against its entry count
pub const fn validate_column_span(count: u32, start: u32, end: u32) -> Result<(), PackError> {
    if end < start {
        return Err(PackError::CorruptedData);
    }
    if end - start != blocks_for_count(count) {
        return Err(PackError::CorruptedData);
    }
    Ok(())
}

/// Check that the column index streams agree on the column count
///
/// `col_ptr` carries one more entry than `row_count`.
pub const fn validate_column_streams(col_ptr_len: usize, row_count_len: usize) -> Result<u32, PackError> {
    if col_ptr_len != row_count_len + 1 {
        return Err(PackError::InvalidLayout);
    }
    if row_count_len > u32::MAX as usize {
        return Err(PackError::ArraySizeOverflow);
    }
    Ok(row_count_len as u32)
}

/// Check that the per-block metadata streams agree on the block count
pub const fn validate_block_streams(
    total_blocks: usize,
    row_starts_len: usize,
    row_idx_len: usize,
    val_idx_len: usize,
) -> Result<(), PackError> {
    if row_starts_len != total_blocks || row_idx_len != total_blocks || val_idx_len != total_blocks {
        return Err(PackError::InvalidLayout);
    }
    Ok(())
}
