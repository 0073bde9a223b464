//! Runtime configuration for encoding and opening packed matrices

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stream backend used when opening an on-disk matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderBackend {
    /// Buffered sequential file reads
    Buffered,
    /// Memory-mapped files, shared by every reader of a matrix
    Mmap,
}

impl Default for ReaderBackend {
    fn default() -> Self {
        if cfg!(feature = "mmap") {
            ReaderBackend::Mmap
        } else {
            ReaderBackend::Buffered
        }
    }
}

/// Configuration for packed matrix writers and readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Blocks encoded between interrupt polls inside a column
    pub interrupt_every_blocks: u32,
    /// Buffer size in bytes for file-backed streams
    pub io_buffer_size: usize,
    /// Backend used to read on-disk streams
    pub reader: ReaderBackend,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            interrupt_every_blocks: 16,
            io_buffer_size: 64 * 1024,
            reader: ReaderBackend::default(),
        }
    }
}

impl PackConfig {
    /// Set how many blocks are encoded between interrupt polls
    pub fn with_interrupt_every_blocks(mut self, blocks: u32) -> Self {
        self.interrupt_every_blocks = blocks;
        self
    }

    /// Set the file stream buffer size in bytes
    pub fn with_io_buffer_size(mut self, bytes: usize) -> Self {
        self.io_buffer_size = bytes;
        self
    }

    /// Set the on-disk reader backend
    pub fn with_reader(mut self, reader: ReaderBackend) -> Self {
        self.reader = reader;
        self
    }

    /// Reject values the encoder cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.interrupt_every_blocks == 0 {
            return Err(Error::Config("interrupt_every_blocks must be at least 1".into()));
        }
        if self.io_buffer_size < packmat_core::format::constants::WORD_BYTES {
            return Err(Error::Config("io_buffer_size must hold at least one word".into()));
        }
        #[cfg(not(feature = "mmap"))]
        if self.reader == ReaderBackend::Mmap {
            return Err(Error::Config("mmap reader requested but the `mmap` feature is disabled".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
