//! packmat - Column-Streaming Bit-Packed Sparse Matrices
//!
//! This library stores large, mostly-zero matrices column by column in seven
//! parallel `u32` streams, bit-packing row indices and values in blocks of
//! 128 entries, and reads them back one column at a time without
//! materializing the matrix.
//!
//! ## Architecture
//!
//! - **packmat-core**: codec, stream and matrix protocol traits, format
//!   definitions and validation (no I/O, `no_std`)
//! - **packmat**: packed reader and writer, memory/file/mmap stream backends,
//!   on-disk container, decorators and configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use packmat::{read_columns, CscMatrix, NeverInterrupt, PackConfig, PackedDir};
//!
//! fn example() -> packmat::Result<()> {
//!     let counts = CscMatrix::from_triplets(3, 2, &[(0, 0, 5u32), (2, 0, 9), (1, 1, 7)])?;
//!     PackedDir::write("counts", &mut counts.loader(), &PackConfig::default(), &NeverInterrupt)?;
//!
//!     let stored = PackedDir::open("counts", &PackConfig::default())?;
//!     let columns = read_columns(&mut stored.reader()?)?;
//!     assert_eq!(columns[0], [(0, 5), (2, 9)]);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): memory-mapped stream reader shared across readers

pub use packmat_core::{
    // Protocol traits
    InterruptCheck, MatrixLoader, MatrixValue, MatrixWriter, NeverInterrupt, UIntReader, UIntWriter,
    // Format definitions
    MatrixShape, PackedStreams, StreamKind, BLOCK_SIZE,
    // Error handling
    ErrorCategory, PackError,
};

pub mod config;
pub mod error;
pub mod interrupt;
pub mod labels;
pub mod matrix;
pub mod packed;
pub mod storage;
pub mod streams;
pub mod transforms;

pub use config::{PackConfig, ReaderBackend};
pub use error::{Error, Result};
pub use interrupt::{CancellationToken, Deadline};
pub use labels::LabelSet;
pub use matrix::{read_columns, CscLoader, CscMatrix, CscWriter};
pub use packed::{PackedMatrix, PackedMatrixWriter, WriteSummary};
pub use storage::{Manifest, MemoryMatrix, PackedDir};
pub use streams::{DiskReader, FileReader, FileWriter, SliceReader, VecWriter};
#[cfg(feature = "mmap")]
pub use streams::MmapReader;
pub use transforms::{Rename, RenameDims};
