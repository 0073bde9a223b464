//! Integer stream backends
//!
//! Every backend implements the sequential [`UIntReader`] / [`UIntWriter`]
//! contract from `packmat-core`; the codec never sees which one it is using.

pub mod file;
pub mod memory;
#[cfg(feature = "mmap")]
pub mod mmap;

pub use file::{FileReader, FileWriter};
pub use memory::{SliceReader, VecWriter};
#[cfg(feature = "mmap")]
pub use mmap::MmapReader;

use crate::config::{PackConfig, ReaderBackend};
use packmat_core::{Result, UIntReader};
use std::path::Path;

/// On-disk stream reader chosen at runtime from [`ReaderBackend`]
#[derive(Debug)]
pub enum DiskReader {
    Buffered(FileReader),
    #[cfg(feature = "mmap")]
    Mmap(MmapReader),
}

impl DiskReader {
    /// Open `path` with the backend named in `config`
    pub fn open<P: AsRef<Path>>(path: P, config: &PackConfig) -> Result<Self> {
        match config.reader {
            #[cfg(feature = "mmap")]
            ReaderBackend::Mmap => Ok(DiskReader::Mmap(MmapReader::open(path)?)),
            #[cfg(not(feature = "mmap"))]
            ReaderBackend::Mmap => Err(packmat_core::PackError::Io("mmap support not compiled in")),
            ReaderBackend::Buffered => Ok(DiskReader::Buffered(FileReader::open(path, config.io_buffer_size)?)),
        }
    }
}

impl UIntReader for DiskReader {
    fn len(&self) -> usize {
        match self {
            DiskReader::Buffered(r) => r.len(),
            #[cfg(feature = "mmap")]
            DiskReader::Mmap(r) => r.len(),
        }
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        match self {
            DiskReader::Buffered(r) => r.read(out),
            #[cfg(feature = "mmap")]
            DiskReader::Mmap(r) => r.read(out),
        }
    }

    fn restart(&mut self) -> Result<()> {
        match self {
            DiskReader::Buffered(r) => r.restart(),
            #[cfg(feature = "mmap")]
            DiskReader::Mmap(r) => r.restart(),
        }
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        match self {
            DiskReader::Buffered(r) => r.skip(count),
            #[cfg(feature = "mmap")]
            DiskReader::Mmap(r) => r.skip(count),
        }
    }
}
