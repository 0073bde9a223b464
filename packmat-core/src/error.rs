//! Error types for packed matrix operations

/// Errors that can occur while encoding, decoding or iterating a packed matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    /// Stream lengths disagree with each other at construction
    InvalidLayout,
    /// Row/column label count does not match the matrix dimension
    LabelCountMismatch,
    /// Label is empty, too long or contains control bytes
    InvalidLabel,
    /// Names were supplied together with a request to clear them
    ConflictingLabels,
    /// Bit width outside `0..=32`
    InvalidBitWidth,
    /// More than one block worth of integers handed to the codec
    BlockTooLarge,
    /// A value does not fit the block's baseline and bit width
    BlockOverflow,
    /// Stream content inconsistent with block or column metadata
    CorruptedData,
    /// A stream ended before the metadata said it would
    UnexpectedEndOfStream,
    /// Row or column index out of bounds
    IndexOutOfBounds,
    /// Source matrix yielded columns out of order
    ColumnOrder,
    /// Output buffer smaller than the requested count
    InsufficientBuffer,
    /// `load` asked for zero entries
    EmptyRequest,
    /// `load` called before `next_col`
    NoCurrentColumn,
    /// A previous decode error left the iterator unusable until `restart`
    IteratorFailed,
    /// Stream or writer already finalized
    WriterClosed,
    /// Cooperative cancellation was requested
    Interrupted,
    /// Byte length not a multiple of the element size
    ArrayAlignment,
    /// Array length would overflow index arithmetic
    ArraySizeOverflow,
    /// Underlying storage failed
    Io(&'static str),
}

/// Coarse classification of a [`PackError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed construction parameters; fatal to that object
    Configuration,
    /// Encoded data inconsistent with its metadata
    Decode,
    /// Caller asked the operation to stop
    Cancelled,
    /// Storage backend failure
    Io,
    /// Protocol misuse by the caller
    Usage,
}

impl PackError {
    /// Classify the error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            PackError::InvalidLayout
            | PackError::LabelCountMismatch
            | PackError::InvalidLabel
            | PackError::ConflictingLabels => ErrorCategory::Configuration,
            PackError::InvalidBitWidth
            | PackError::BlockOverflow
            | PackError::CorruptedData
            | PackError::UnexpectedEndOfStream
            | PackError::ArrayAlignment
            | PackError::ArraySizeOverflow => ErrorCategory::Decode,
            PackError::Interrupted => ErrorCategory::Cancelled,
            PackError::Io(_) => ErrorCategory::Io,
            PackError::BlockTooLarge
            | PackError::IndexOutOfBounds
            | PackError::ColumnOrder
            | PackError::InsufficientBuffer
            | PackError::EmptyRequest
            | PackError::NoCurrentColumn
            | PackError::IteratorFailed
            | PackError::WriterClosed => ErrorCategory::Usage,
        }
    }
}

impl core::fmt::Display for PackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            PackError::InvalidLayout => "Stream lengths are inconsistent",
            PackError::LabelCountMismatch => "Label count does not match dimension",
            PackError::InvalidLabel => "Invalid label",
            PackError::ConflictingLabels => "Labels supplied while clearing labels",
            PackError::InvalidBitWidth => "Bit width exceeds 32",
            PackError::BlockTooLarge => "Block holds more than 128 integers",
            PackError::BlockOverflow => "Value does not fit block bit width",
            PackError::CorruptedData => "Data corruption detected",
            PackError::UnexpectedEndOfStream => "Unexpected end of stream",
            PackError::IndexOutOfBounds => "Index out of bounds",
            PackError::ColumnOrder => "Columns out of order",
            PackError::InsufficientBuffer => "Insufficient buffer space",
            PackError::EmptyRequest => "Load count must be at least 1",
            PackError::NoCurrentColumn => "No current column",
            PackError::IteratorFailed => "Iterator failed; restart required",
            PackError::WriterClosed => "Writer already finalized",
            PackError::Interrupted => "Interrupted",
            PackError::ArrayAlignment => "Array size not aligned to element size",
            PackError::ArraySizeOverflow => "Array size overflow",
            PackError::Io(msg) => return write!(f, "I/O error: {msg}"),
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for PackError {}

/// Result type for packed matrix operations
pub type Result<T> = core::result::Result<T, PackError>;
