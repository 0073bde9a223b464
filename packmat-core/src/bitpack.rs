//! Fixed-block bit packing with frame-of-reference baselines
//!
//! A block holds up to [`BLOCK_SIZE`] integers. Each integer is stored as its
//! distance from the block baseline, using the narrowest width that fits every
//! distance in the block. Fields are laid out LSB-first across consecutive
//! `u32` words: field `i` occupies bits `[i * w, (i + 1) * w)` of the block's
//! word run, so `n` fields at width `w` take `ceil(n * w / 32)` words.

use crate::{PackError, Result};

/// Integers per block
pub const BLOCK_SIZE: usize = 128;

/// Widest field a block may declare
pub const MAX_BIT_WIDTH: u32 = 32;

/// Packed words needed by a full block at the widest width
pub const MAX_PACKED_WORDS: usize = BLOCK_SIZE;

/// How a block chooses its frame-of-reference value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Store values as-is
    Zero,
    /// Subtract the block minimum
    Minimum,
}

/// Per-block metadata stored next to the packed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockHeader {
    /// Value subtracted from every field before packing
    pub baseline: u32,
    /// Bits per packed field
    pub width: u32,
}

/// Number of bits needed to represent `max_delta`
#[inline]
pub const fn bits_needed(max_delta: u32) -> u32 {
    u32::BITS - max_delta.leading_zeros()
}

/// Words occupied by `count` fields of `width` bits
#[inline]
pub const fn packed_len(count: usize, width: u32) -> usize {
    (count * width as usize).div_ceil(32)
}

#[inline]
const fn field_mask(width: u32) -> u32 {
    if width >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Choose the baseline and the minimal width for a group of values
///
/// An empty group, or a group of identical values under
/// [`Baseline::Minimum`], gets width 0.
pub fn analyze(values: &[u32], mode: Baseline) -> BlockHeader {
    let Some(&first) = values.first() else {
        return BlockHeader::default();
    };
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let baseline = match mode {
        Baseline::Zero => 0,
        Baseline::Minimum => min,
    };

    BlockHeader {
        baseline,
        width: bits_needed(max - baseline),
    }
}

/// Pack `values` into `out` using `header`, returning the words written
///
/// `out` must hold at least [`packed_len`] words. Fails with
/// [`PackError::BlockOverflow`] if any value lies outside
/// `baseline..baseline + 2^width`.
pub fn pack(values: &[u32], header: BlockHeader, out: &mut [u32]) -> Result<usize> {
    if values.len() > BLOCK_SIZE {
        return Err(PackError::BlockTooLarge);
    }
    if header.width > MAX_BIT_WIDTH {
        return Err(PackError::InvalidBitWidth);
    }

    let words = packed_len(values.len(), header.width);
    let out = out.get_mut(..words).ok_or(PackError::InsufficientBuffer)?;
    out.fill(0);

    let width = header.width;
    let mask = field_mask(width);
    let mut bit_pos = 0usize;

    for &value in values {
        let delta = value
            .checked_sub(header.baseline)
            .filter(|&d| d & !mask == 0)
            .ok_or(PackError::BlockOverflow)?;
        if width == 0 {
            continue;
        }

        let word = bit_pos / 32;
        let shift = (bit_pos % 32) as u32;
        out[word] |= delta << shift;
        // Field straddles a word boundary; shift > 0 here since width <= 32
        if shift + width > 32 {
            out[word + 1] |= delta >> (32 - shift);
        }
        bit_pos += width as usize;
    }

    Ok(words)
}

/// Unpack `out.len()` fields from `packed`, adding the baseline back
pub fn unpack(packed: &[u32], header: BlockHeader, out: &mut [u32]) -> Result<()> {
    if out.len() > BLOCK_SIZE {
        return Err(PackError::BlockTooLarge);
    }
    if header.width > MAX_BIT_WIDTH {
        return Err(PackError::InvalidBitWidth);
    }
    if packed.len() < packed_len(out.len(), header.width) {
        return Err(PackError::UnexpectedEndOfStream);
    }

    let width = header.width;
    if width == 0 {
        out.fill(header.baseline);
        return Ok(());
    }

    let mask = field_mask(width);
    let mut bit_pos = 0usize;
    for slot in out.iter_mut() {
        let word = bit_pos / 32;
        let shift = (bit_pos % 32) as u32;
        let mut field = packed[word] >> shift;
        if shift + width > 32 {
            field |= packed[word + 1] << (32 - shift);
        }
        *slot = header
            .baseline
            .checked_add(field & mask)
            .ok_or(PackError::CorruptedData)?;
        bit_pos += width as usize;
    }

    Ok(())
}

/// Analyze and pack in one step
pub fn encode_block(values: &[u32], mode: Baseline, out: &mut [u32]) -> Result<(BlockHeader, usize)> {
    let header = analyze(values, mode);
    let words = pack(values, header, out)?;
    Ok((header, words))
}
