//! Column-streaming decoder over the seven packed streams
//!
//! The reader walks every stream strictly forward. Block metadata is read
//! one block at a time, payload words are read exactly as the declared bit
//! width requires, and undelivered blocks of a column are skipped when the
//! caller moves on with `next_col`.

use packmat_core::bitpack::{packed_len, unpack, BlockHeader, MAX_PACKED_WORDS};
use packmat_core::validation::{block_len, validate_block_streams, validate_column_span, validate_column_streams};
use packmat_core::{
    validate_load_request, MatrixLoader, MatrixShape, PackError, PackedStreams, Result, UIntReader, BLOCK_SIZE,
    MAX_BIT_WIDTH,
};
use tracing::{debug, trace, warn};

/// Decoded entries of a partially delivered block
#[derive(Debug)]
struct BlockBuffer {
    rows: [u32; BLOCK_SIZE],
    vals: [u32; BLOCK_SIZE],
    len: usize,
    pos: usize,
}

impl BlockBuffer {
    fn new() -> Self {
        Self {
            rows: [0; BLOCK_SIZE],
            vals: [0; BLOCK_SIZE],
            len: 0,
            pos: 0,
        }
    }

    fn clear(&mut self) {
        self.len = 0;
        self.pos = 0;
    }

    fn remaining(&self) -> usize {
        self.len - self.pos
    }
}

/// Position inside the block-level streams
#[derive(Debug)]
struct BlockCursor {
    /// Next block to decode or skip
    block: u32,
    /// Words consumed from `row_data`
    prev_row_idx: usize,
    /// Words consumed from `val_data`
    prev_val_idx: usize,
    scratch: [u32; MAX_PACKED_WORDS],
}

impl BlockCursor {
    fn new() -> Self {
        Self {
            block: 0,
            prev_row_idx: 0,
            prev_val_idx: 0,
            scratch: [0; MAX_PACKED_WORDS],
        }
    }

    fn read_headers<R: UIntReader>(streams: &mut PackedStreams<R>) -> Result<(BlockHeader, BlockHeader)> {
        let baseline = streams.row_starts.read_one()?;
        let row_width = streams.row_idx.read_one()?;
        let val_width = streams.val_idx.read_one()?;
        if row_width > MAX_BIT_WIDTH || val_width > MAX_BIT_WIDTH {
            return Err(PackError::InvalidBitWidth);
        }
        let row = BlockHeader { baseline, width: row_width };
        let val = BlockHeader { baseline: 0, width: val_width };
        Ok((row, val))
    }

    /// Decode the next block of `rows.len()` entries
    fn decode<R: UIntReader>(
        &mut self,
        streams: &mut PackedStreams<R>,
        n_rows: u32,
        rows: &mut [u32],
        vals: &mut [u32],
    ) -> Result<()> {
        let (row, val) = Self::read_headers(streams)?;
        let n = rows.len();

        let words = packed_len(n, row.width);
        streams.row_data.read_exact(&mut self.scratch[..words])?;
        unpack(&self.scratch[..words], row, rows)?;
        self.prev_row_idx += words;

        let words = packed_len(n, val.width);
        streams.val_data.read_exact(&mut self.scratch[..words])?;
        unpack(&self.scratch[..words], val, vals)?;
        self.prev_val_idx += words;

        if rows.iter().any(|&r| r >= n_rows) {
            return Err(PackError::CorruptedData);
        }

        trace!(block = self.block, n, row_width = row.width, val_width = val.width, "decoded block");
        self.block += 1;
        Ok(())
    }

    /// Step over the next block of `n` entries without decoding it
    fn skip<R: UIntReader>(&mut self, streams: &mut PackedStreams<R>, n: usize) -> Result<()> {
        let (row, val) = Self::read_headers(streams)?;
        let row_words = packed_len(n, row.width);
        let val_words = packed_len(n, val.width);
        streams.row_data.skip(row_words)?;
        streams.val_data.skip(val_words)?;
        self.prev_row_idx += row_words;
        self.prev_val_idx += val_words;
        self.block += 1;
        Ok(())
    }
}

/// Iterator state owned by one reader
#[derive(Debug)]
struct DecodeState {
    current_col: Option<u32>,
    exhausted: bool,
    failed: bool,
    /// First block of the column after the current one
    next_col_ptr: u32,
    /// Entries in the current column
    col_len: u32,
    /// Entries delivered from the current column
    current_idx: u32,
    /// Entries decoded from the current column, delivered or buffered
    decoded: u32,
    cursor: BlockCursor,
    buf: BlockBuffer,
}

impl DecodeState {
    fn new() -> Self {
        Self {
            current_col: None,
            exhausted: false,
            failed: false,
            next_col_ptr: 0,
            col_len: 0,
            current_idx: 0,
            decoded: 0,
            cursor: BlockCursor::new(),
            buf: BlockBuffer::new(),
        }
    }

    fn reset(&mut self) {
        self.current_col = None;
        self.exhausted = false;
        self.failed = false;
        self.next_col_ptr = 0;
        self.col_len = 0;
        self.current_idx = 0;
        self.decoded = 0;
        self.cursor.block = 0;
        self.cursor.prev_row_idx = 0;
        self.cursor.prev_val_idx = 0;
        self.buf.clear();
    }
}

/// Read-only column iterator over a packed encoding
///
/// Each instance exclusively owns its streams and cursor state. Several
/// readers over the same immutable encoding are independent.
#[derive(Debug)]
pub struct PackedMatrix<R> {
    streams: PackedStreams<R>,
    shape: MatrixShape,
    total_blocks: u32,
    state: Box<DecodeState>,
}

impl<R: UIntReader> PackedMatrix<R> {
    /// Open a reader over complete streams for a matrix with `n_rows` rows
    ///
    /// The column count comes from `row_count`. Fails with
    /// [`PackError::InvalidLayout`] when the stream lengths disagree.
    pub fn new(streams: PackedStreams<R>, n_rows: u32) -> Result<Self> {
        let n_cols = validate_column_streams(streams.col_ptr.len(), streams.row_count.len())?;
        let total = streams.row_starts.len();
        validate_block_streams(total, streams.row_starts.len(), streams.row_idx.len(), streams.val_idx.len())?;
        let total_blocks = u32::try_from(total).map_err(|_| PackError::ArraySizeOverflow)?;

        let mut matrix = Self {
            streams,
            shape: MatrixShape::new(n_rows, n_cols),
            total_blocks,
            state: Box::new(DecodeState::new()),
        };
        matrix.restart()?;
        debug!(shape = %matrix.shape, blocks = total_blocks, "opened packed matrix");
        Ok(matrix)
    }

    pub fn shape(&self) -> MatrixShape {
        self.shape
    }

    /// Number of 128-entry blocks in the encoding
    pub fn total_blocks(&self) -> u32 {
        self.total_blocks
    }

    /// Entries already delivered from the current column
    pub fn current_idx(&self) -> u32 {
        self.state.current_idx
    }

    /// Entry count of the current column
    pub fn current_len(&self) -> Option<u32> {
        self.state.current_col.map(|_| self.state.col_len)
    }

    /// Release the underlying streams
    pub fn into_streams(self) -> PackedStreams<R> {
        self.streams
    }

    fn fail(&mut self, err: PackError) -> PackError {
        warn!(col = ?self.state.current_col, block = self.state.cursor.block, error = %err, "packed matrix decode failed");
        self.state.failed = true;
        err
    }

    fn rewind(&mut self) -> Result<()> {
        self.streams.each_mut().try_map(|_, stream| stream.restart())?;
        self.state.reset();
        if self.streams.col_ptr.read_one()? != 0 {
            return Err(PackError::CorruptedData);
        }
        Ok(())
    }

    fn skip_rest_of_column(&mut self) -> Result<()> {
        let state = &mut *self.state;
        state.buf.clear();
        while state.cursor.block < state.next_col_ptr {
            let n = block_len(state.col_len, state.decoded / BLOCK_SIZE as u32);
            state.cursor.skip(&mut self.streams, n)?;
            state.decoded += n as u32;
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<bool> {
        let next = match self.state.current_col {
            Some(col) => {
                self.skip_rest_of_column()?;
                col + 1
            }
            None => 0,
        };

        if next == self.shape.n_cols {
            let cursor = &self.state.cursor;
            if self.state.next_col_ptr != self.total_blocks
                || cursor.prev_row_idx != self.streams.row_data.len()
                || cursor.prev_val_idx != self.streams.val_data.len()
            {
                return Err(PackError::CorruptedData);
            }
            self.state.current_col = None;
            self.state.exhausted = true;
            return Ok(false);
        }

        let count = self.streams.row_count.read_one()?;
        let end = self.streams.col_ptr.read_one()?;
        if end > self.total_blocks {
            return Err(PackError::CorruptedData);
        }
        validate_column_span(count, self.state.next_col_ptr, end)?;

        let state = &mut *self.state;
        state.current_col = Some(next);
        state.next_col_ptr = end;
        state.col_len = count;
        state.current_idx = 0;
        state.decoded = 0;
        state.buf.clear();
        Ok(true)
    }

    fn load_entries(&mut self, count: usize, rows: &mut [u32], vals: &mut [u32]) -> Result<usize> {
        let n_rows = self.shape.n_rows;
        let state = &mut *self.state;
        let mut written = 0;

        while written < count {
            let buffered = state.buf.remaining();
            if buffered > 0 {
                let take = buffered.min(count - written);
                let src = state.buf.pos..state.buf.pos + take;
                rows[written..written + take].copy_from_slice(&state.buf.rows[src.clone()]);
                vals[written..written + take].copy_from_slice(&state.buf.vals[src]);
                state.buf.pos += take;
                written += take;
                continue;
            }

            if state.decoded == state.col_len {
                break;
            }

            let n = block_len(state.col_len, state.decoded / BLOCK_SIZE as u32);
            if count - written >= n {
                // Whole block fits the caller's buffers; skip the staging copy
                let dst = written..written + n;
                state
                    .cursor
                    .decode(&mut self.streams, n_rows, &mut rows[dst.clone()], &mut vals[dst])?;
                written += n;
            } else {
                state
                    .cursor
                    .decode(&mut self.streams, n_rows, &mut state.buf.rows[..n], &mut state.buf.vals[..n])?;
                state.buf.len = n;
                state.buf.pos = 0;
            }
            state.decoded += n as u32;
        }

        state.current_idx += written as u32;
        Ok(written)
    }
}

impl<R: UIntReader> MatrixLoader<u32> for PackedMatrix<R> {
    fn rows(&self) -> u32 {
        self.shape.n_rows
    }

    fn cols(&self) -> u32 {
        self.shape.n_cols
    }

    fn restart(&mut self) -> Result<()> {
        self.rewind().map_err(|e| self.fail(e))
    }

    fn next_col(&mut self) -> Result<bool> {
        if self.state.failed {
            return Err(PackError::IteratorFailed);
        }
        if self.state.exhausted {
            return Ok(false);
        }
        self.advance().map_err(|e| self.fail(e))
    }

    fn current_col(&self) -> Option<u32> {
        self.state.current_col
    }

    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [u32]) -> Result<usize> {
        validate_load_request(count, rows.len(), vals.len())?;
        if self.state.failed {
            return Err(PackError::IteratorFailed);
        }
        if self.state.current_col.is_none() {
            return Err(PackError::NoCurrentColumn);
        }
        self.load_entries(count, rows, vals).map_err(|e| self.fail(e))
    }
}
