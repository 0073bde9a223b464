//! The seven parallel integer streams that make up one encoded matrix

/// Identifies one of the encoded streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StreamKind {
    /// Bit-packed value fields, concatenated across blocks
    ValData,
    /// One value bit width per block
    ValIdx,
    /// Bit-packed row-index deltas, concatenated across blocks
    RowData,
    /// One row baseline per block
    RowStarts,
    /// One row-delta bit width per block
    RowIdx,
    /// `n_cols + 1` block offsets
    ColPtr,
    /// Entry count per column
    RowCount,
}

impl StreamKind {
    /// All streams in storage order
    pub const ALL: [StreamKind; 7] = [
        StreamKind::ValData,
        StreamKind::ValIdx,
        StreamKind::RowData,
        StreamKind::RowStarts,
        StreamKind::RowIdx,
        StreamKind::ColPtr,
        StreamKind::RowCount,
    ];

    /// Stable name used for file names and diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            StreamKind::ValData => "val_data",
            StreamKind::ValIdx => "val_idx",
            StreamKind::RowData => "row_data",
            StreamKind::RowStarts => "row_starts",
            StreamKind::RowIdx => "row_idx",
            StreamKind::ColPtr => "col_ptr",
            StreamKind::RowCount => "row_count",
        }
    }
}

impl core::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One handle per stream, owned together
///
/// Readers and writers take this by value so that each instance has
/// exclusive ownership of its streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedStreams<S> {
    pub val_data: S,
    pub val_idx: S,
    pub row_data: S,
    pub row_starts: S,
    pub row_idx: S,
    pub col_ptr: S,
    pub row_count: S,
}

impl<S> PackedStreams<S> {
    /// Build every stream with a fallible constructor
    pub fn try_from_fn<E>(mut f: impl FnMut(StreamKind) -> Result<S, E>) -> Result<Self, E> {
        Ok(Self {
            val_data: f(StreamKind::ValData)?,
            val_idx: f(StreamKind::ValIdx)?,
            row_data: f(StreamKind::RowData)?,
            row_starts: f(StreamKind::RowStarts)?,
            row_idx: f(StreamKind::RowIdx)?,
            col_ptr: f(StreamKind::ColPtr)?,
            row_count: f(StreamKind::RowCount)?,
        })
    }

    /// Transform every stream
    pub fn map<U>(self, mut f: impl FnMut(StreamKind, S) -> U) -> PackedStreams<U> {
        PackedStreams {
            val_data: f(StreamKind::ValData, self.val_data),
            val_idx: f(StreamKind::ValIdx, self.val_idx),
            row_data: f(StreamKind::RowData, self.row_data),
            row_starts: f(StreamKind::RowStarts, self.row_starts),
            row_idx: f(StreamKind::RowIdx, self.row_idx),
            col_ptr: f(StreamKind::ColPtr, self.col_ptr),
            row_count: f(StreamKind::RowCount, self.row_count),
        }
    }

    /// Transform every stream with a fallible function
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(StreamKind, S) -> Result<U, E>,
    ) -> Result<PackedStreams<U>, E> {
        Ok(PackedStreams {
            val_data: f(StreamKind::ValData, self.val_data)?,
            val_idx: f(StreamKind::ValIdx, self.val_idx)?,
            row_data: f(StreamKind::RowData, self.row_data)?,
            row_starts: f(StreamKind::RowStarts, self.row_starts)?,
            row_idx: f(StreamKind::RowIdx, self.row_idx)?,
            col_ptr: f(StreamKind::ColPtr, self.col_ptr)?,
            row_count: f(StreamKind::RowCount, self.row_count)?,
        })
    }

    /// Borrow every stream
    pub fn each_ref(&self) -> PackedStreams<&S> {
        PackedStreams {
            val_data: &self.val_data,
            val_idx: &self.val_idx,
            row_data: &self.row_data,
            row_starts: &self.row_starts,
            row_idx: &self.row_idx,
            col_ptr: &self.col_ptr,
            row_count: &self.row_count,
        }
    }

    /// Mutably borrow every stream
    pub fn each_mut(&mut self) -> PackedStreams<&mut S> {
        PackedStreams {
            val_data: &mut self.val_data,
            val_idx: &mut self.val_idx,
            row_data: &mut self.row_data,
            row_starts: &mut self.row_starts,
            row_idx: &mut self.row_idx,
            col_ptr: &mut self.col_ptr,
            row_count: &mut self.row_count,
        }
    }

    /// Borrow the stream for `kind`
    pub fn get(&self, kind: StreamKind) -> &S {
        match kind {
            StreamKind::ValData => &self.val_data,
            StreamKind::ValIdx => &self.val_idx,
            StreamKind::RowData => &self.row_data,
            StreamKind::RowStarts => &self.row_starts,
            StreamKind::RowIdx => &self.row_idx,
            StreamKind::ColPtr => &self.col_ptr,
            StreamKind::RowCount => &self.row_count,
        }
    }
}
