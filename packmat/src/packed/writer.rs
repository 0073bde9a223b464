//! Single-pass encoder from any column loader into the seven packed streams

use crate::config::PackConfig;
use packmat_core::bitpack::{encode_block, Baseline, MAX_PACKED_WORDS};
use packmat_core::{
    InterruptCheck, MatrixLoader, MatrixShape, MatrixWriter, PackError, PackedStreams, Result, UIntWriter,
    BLOCK_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Totals reported by a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteSummary {
    pub shape: MatrixShape,
    /// Entries read from the source
    pub entries: u64,
    /// Blocks emitted across all columns
    pub blocks: u32,
    /// Words in `row_data`
    pub row_words: u64,
    /// Words in `val_data`
    pub val_words: u64,
}

impl WriteSummary {
    /// Words across all seven streams
    pub fn total_words(&self) -> u64 {
        let per_block = 3 * self.blocks as u64;
        let per_col = 2 * self.shape.n_cols as u64 + 1;
        self.row_words + self.val_words + per_block + per_col
    }

    /// Stored bits per entry, or 0 for an empty matrix
    pub fn bits_per_entry(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        (self.total_words() * 32) as f64 / self.entries as f64
    }
}

/// Staging buffers for the block being filled
#[derive(Debug)]
struct BlockEncoder {
    rows: [u32; BLOCK_SIZE],
    vals: [u32; BLOCK_SIZE],
    len: usize,
    packed: [u32; MAX_PACKED_WORDS],
    blocks: u32,
    row_words: u64,
    val_words: u64,
}

impl BlockEncoder {
    fn new() -> Self {
        Self {
            rows: [0; BLOCK_SIZE],
            vals: [0; BLOCK_SIZE],
            len: 0,
            packed: [0; MAX_PACKED_WORDS],
            blocks: 0,
            row_words: 0,
            val_words: 0,
        }
    }

    /// Emit the staged entries as one block
    fn flush<W: UIntWriter>(&mut self, streams: &mut PackedStreams<W>) -> Result<()> {
        if self.len == 0 {
            return Ok(());
        }

        let (row, words) = encode_block(&self.rows[..self.len], Baseline::Minimum, &mut self.packed)?;
        streams.row_starts.write_one(row.baseline)?;
        streams.row_idx.write_one(row.width)?;
        streams.row_data.write(&self.packed[..words])?;
        self.row_words += words as u64;

        let (val, words) = encode_block(&self.vals[..self.len], Baseline::Zero, &mut self.packed)?;
        streams.val_idx.write_one(val.width)?;
        streams.val_data.write(&self.packed[..words])?;
        self.val_words += words as u64;

        trace!(block = self.blocks, n = self.len, row_width = row.width, val_width = val.width, "encoded block");
        self.blocks = self.blocks.checked_add(1).ok_or(PackError::ArraySizeOverflow)?;
        self.len = 0;
        Ok(())
    }

    /// Drain the loader's current column, returning its entry count
    fn encode_column<W: UIntWriter>(
        &mut self,
        streams: &mut PackedStreams<W>,
        loader: &mut dyn MatrixLoader<u32>,
        n_rows: u32,
        interrupt_every: u32,
        interrupt: &dyn InterruptCheck,
    ) -> Result<u32> {
        let mut count = 0u32;
        loop {
            let free = BLOCK_SIZE - self.len;
            let n = loader.load(free, &mut self.rows[self.len..], &mut self.vals[self.len..])?;
            if n == 0 {
                break;
            }
            if n > free {
                return Err(PackError::BlockTooLarge);
            }
            if self.rows[self.len..self.len + n].iter().any(|&r| r >= n_rows) {
                return Err(PackError::IndexOutOfBounds);
            }
            self.len += n;
            count = u32::try_from(n)
                .ok()
                .and_then(|n| count.checked_add(n))
                .ok_or(PackError::ArraySizeOverflow)?;

            if self.len == BLOCK_SIZE {
                self.flush(streams)?;
                if self.blocks % interrupt_every == 0 && interrupt.should_stop() {
                    return Err(PackError::Interrupted);
                }
            }
        }
        self.flush(streams)?;
        Ok(count)
    }
}

/// Record a finished column: its entry count and the block offset after it
fn commit_column<W: UIntWriter>(streams: &mut PackedStreams<W>, count: u32, end_block: u32) -> Result<()> {
    streams.row_count.write_one(count)?;
    streams.col_ptr.write_one(end_block)
}

/// Encodes a matrix into seven writable streams
///
/// A writer performs exactly one traversal. After a failed or interrupted
/// write the streams hold no usable encoding and are never finalized.
#[derive(Debug)]
pub struct PackedMatrixWriter<W> {
    streams: PackedStreams<W>,
    interrupt_every_blocks: u32,
    summary: Option<WriteSummary>,
    used: bool,
}

impl<W: UIntWriter> PackedMatrixWriter<W> {
    /// Writer with the default interrupt cadence
    pub fn new(streams: PackedStreams<W>) -> Self {
        Self::with_cadence(streams, PackConfig::default().interrupt_every_blocks)
    }

    /// Writer polling the interrupt check as often as `config` asks
    ///
    /// Fails with [`crate::Error::Config`] when `config` does not validate.
    pub fn with_config(streams: PackedStreams<W>, config: &PackConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::with_cadence(streams, config.interrupt_every_blocks))
    }

    fn with_cadence(streams: PackedStreams<W>, interrupt_every_blocks: u32) -> Self {
        Self {
            streams,
            interrupt_every_blocks,
            summary: None,
            used: false,
        }
    }

    /// Totals of the completed write, if it succeeded
    pub fn summary(&self) -> Option<&WriteSummary> {
        self.summary.as_ref()
    }

    /// Release the streams
    pub fn into_streams(self) -> PackedStreams<W> {
        self.streams
    }

    fn encode(&mut self, loader: &mut dyn MatrixLoader<u32>, interrupt: &dyn InterruptCheck) -> Result<WriteSummary> {
        loader.restart()?;
        let shape = MatrixShape::new(loader.rows(), loader.cols());
        debug!(%shape, "encoding packed matrix");

        let streams = &mut self.streams;
        let mut enc = Box::new(BlockEncoder::new());
        let mut entries = 0u64;
        let mut next_col = 0u32;

        streams.col_ptr.write_one(0)?;
        while loader.next_col()? {
            let col = loader.current_col().ok_or(PackError::NoCurrentColumn)?;
            if col < next_col {
                return Err(PackError::ColumnOrder);
            }
            if col >= shape.n_cols {
                return Err(PackError::IndexOutOfBounds);
            }
            // Columns the source skipped are empty
            while next_col < col {
                commit_column(streams, 0, enc.blocks)?;
                next_col += 1;
            }

            let count = enc.encode_column(streams, loader, shape.n_rows, self.interrupt_every_blocks, interrupt)?;
            commit_column(streams, count, enc.blocks)?;
            entries += count as u64;
            next_col += 1;
            trace!(col, count, blocks = enc.blocks, "encoded column");

            if interrupt.should_stop() {
                return Err(PackError::Interrupted);
            }
        }
        while next_col < shape.n_cols {
            commit_column(streams, 0, enc.blocks)?;
            next_col += 1;
        }

        streams.each_mut().try_map(|_, stream| stream.finalize())?;

        Ok(WriteSummary {
            shape,
            entries,
            blocks: enc.blocks,
            row_words: enc.row_words,
            val_words: enc.val_words,
        })
    }
}

impl<W: UIntWriter> MatrixWriter<u32> for PackedMatrixWriter<W> {
    fn write(&mut self, loader: &mut dyn MatrixLoader<u32>, interrupt: &dyn InterruptCheck) -> Result<()> {
        if self.used {
            return Err(PackError::WriterClosed);
        }
        self.used = true;

        match self.encode(loader, interrupt) {
            Ok(summary) => {
                info!(
                    shape = %summary.shape,
                    entries = summary.entries,
                    blocks = summary.blocks,
                    bits_per_entry = summary.bits_per_entry(),
                    "packed matrix written"
                );
                self.summary = Some(summary);
                Ok(())
            }
            Err(PackError::Interrupted) => {
                warn!("packed matrix write interrupted");
                Err(PackError::Interrupted)
            }
            Err(err) => {
                warn!(error = %err, "packed matrix write failed");
                Err(err)
            }
        }
    }
}
