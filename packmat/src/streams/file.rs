//! Buffered file streams
//!
//! Words are stored little-endian with no header; a stream's length is its
//! file length divided by four.

use crate::error::stream_io_error;
use packmat_core::format::constants::WORD_BYTES;
use packmat_core::validation::validate_u32_array_size;
use packmat_core::{words_from_le_bytes, words_to_le_bytes, PackError, Result, UIntReader, UIntWriter};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Words converted per chunk when the host is not little-endian
const SCRATCH_WORDS: usize = 1024;

/// Appends words to a file through a write buffer
#[derive(Debug)]
pub struct FileWriter {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    words: u64,
}

impl FileWriter {
    /// Create or truncate `path`
    pub fn create<P: AsRef<Path>>(path: P, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| stream_io_error("Failed to create stream file", e))?;
        tracing::debug!(path = %path.display(), "created stream file");
        Ok(Self {
            writer: Some(BufWriter::with_capacity(buffer_size, file)),
            path,
            words: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Words written so far
    pub fn words_written(&self) -> u64 {
        self.words
    }
}

impl UIntWriter for FileWriter {
    fn write(&mut self, values: &[u32]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(PackError::WriterClosed)?;
        if cfg!(target_endian = "little") {
            writer
                .write_all(bytemuck::cast_slice(values))
                .map_err(|e| stream_io_error("Failed to write stream file", e))?;
        } else {
            let mut scratch = [0u8; SCRATCH_WORDS * WORD_BYTES];
            for chunk in values.chunks(SCRATCH_WORDS) {
                let len = words_to_le_bytes(chunk, &mut scratch)?;
                writer
                    .write_all(&scratch[..len])
                    .map_err(|e| stream_io_error("Failed to write stream file", e))?;
            }
        }
        self.words += values.len() as u64;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let writer = self.writer.take().ok_or(PackError::WriterClosed)?;
        let file = writer
            .into_inner()
            .map_err(|e| stream_io_error("Failed to flush stream file", e.into_error()))?;
        file.sync_all()
            .map_err(|e| stream_io_error("Failed to sync stream file", e))?;
        tracing::debug!(path = %self.path.display(), words = self.words, "finalized stream file");
        Ok(())
    }
}

/// Reads words from a file through a read buffer
#[derive(Debug)]
pub struct FileReader {
    reader: BufReader<File>,
    len: usize,
    pos: usize,
    scratch: Vec<u8>,
}

impl FileReader {
    /// Open `path`, which must hold a whole number of words
    pub fn open<P: AsRef<Path>>(path: P, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| stream_io_error("Failed to open stream file", e))?;
        let byte_len = file
            .metadata()
            .map_err(|e| stream_io_error("Failed to stat stream file", e))?
            .len();
        let byte_len = usize::try_from(byte_len).map_err(|_| PackError::ArraySizeOverflow)?;
        let len = validate_u32_array_size(byte_len)?;
        Ok(Self {
            reader: BufReader::with_capacity(buffer_size, file),
            len,
            pos: 0,
            scratch: vec![0u8; SCRATCH_WORDS * WORD_BYTES],
        })
    }
}

impl UIntReader for FileReader {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        let n = out.len().min(self.len - self.pos).min(SCRATCH_WORDS);
        if n == 0 {
            return Ok(0);
        }
        let bytes = &mut self.scratch[..n * WORD_BYTES];
        self.reader
            .read_exact(bytes)
            .map_err(|e| stream_io_error("Failed to read stream file", e))?;
        words_from_le_bytes(bytes, out)?;
        self.pos += n;
        Ok(n)
    }

    fn restart(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| stream_io_error("Failed to rewind stream file", e))?;
        self.pos = 0;
        Ok(())
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        if count > self.len - self.pos {
            return Err(PackError::UnexpectedEndOfStream);
        }
        let offset = (count * WORD_BYTES) as i64;
        self.reader
            .seek_relative(offset)
            .map_err(|e| stream_io_error("Failed to seek stream file", e))?;
        self.pos += count;
        Ok(())
    }
}
