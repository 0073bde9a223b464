//! Packed encoding held in shared memory

use crate::config::PackConfig;
use crate::packed::{PackedMatrix, PackedMatrixWriter, WriteSummary};
use crate::streams::{SliceReader, VecWriter};
use crate::Result;
use packmat_core::{InterruptCheck, MatrixLoader, MatrixShape, MatrixWriter, PackError, PackedStreams};
use std::sync::Arc;

/// Immutable in-memory encoding that hands out independent readers
#[derive(Debug, Clone)]
pub struct MemoryMatrix {
    streams: PackedStreams<Arc<[u32]>>,
    summary: WriteSummary,
}

impl MemoryMatrix {
    /// Encode `loader` once
    pub fn encode(
        loader: &mut dyn MatrixLoader<u32>,
        config: &PackConfig,
        interrupt: &dyn InterruptCheck,
    ) -> Result<Self> {
        let mut writer = PackedMatrixWriter::with_config(PackedStreams::<VecWriter>::default(), config)?;
        writer.write(loader, interrupt)?;
        let summary = *writer.summary().ok_or(PackError::WriterClosed)?;
        let streams = writer.into_streams().map(|_, w| Arc::<[u32]>::from(w.into_vec()));
        Ok(Self { streams, summary })
    }

    /// A fresh reader positioned before the first column
    pub fn reader(&self) -> packmat_core::Result<PackedMatrix<SliceReader>> {
        let streams = self.streams.each_ref().map(|_, words| SliceReader::new(Arc::clone(words)));
        PackedMatrix::new(streams, self.summary.shape.n_rows)
    }

    pub fn shape(&self) -> MatrixShape {
        self.summary.shape
    }

    pub fn summary(&self) -> &WriteSummary {
        &self.summary
    }

    /// The encoded words of every stream
    pub fn streams(&self) -> &PackedStreams<Arc<[u32]>> {
        &self.streams
    }

    /// Bytes the encoding occupies
    pub fn stored_bytes(&self) -> usize {
        let s = &self.streams;
        let words = s.val_data.len()
            + s.val_idx.len()
            + s.row_data.len()
            + s.row_starts.len()
            + s.row_idx.len()
            + s.col_ptr.len()
            + s.row_count.len();
        words * packmat_core::format::constants::WORD_BYTES
    }
}
