//! Memory-mapped read-only streams

use crate::error::stream_io_error;
use memmap2::{Mmap, MmapOptions};
use packmat_core::format::constants::WORD_BYTES;
use packmat_core::validation::validate_u32_array_size;
use packmat_core::{words_from_le_bytes, PackError, Result, UIntReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Cursor over a memory-mapped stream file
///
/// Clones share the mapping and carry their own cursor.
#[derive(Debug, Clone)]
pub struct MmapReader {
    // Empty files are never mapped
    map: Option<Arc<Mmap>>,
    len: usize,
    pos: usize,
}

impl MmapReader {
    /// Map `path`, which must hold a whole number of words
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| stream_io_error("Failed to open stream file", e))?;
        let byte_len = file
            .metadata()
            .map_err(|e| stream_io_error("Failed to stat stream file", e))?
            .len();
        let byte_len = usize::try_from(byte_len).map_err(|_| PackError::ArraySizeOverflow)?;
        let len = validate_u32_array_size(byte_len)?;

        let map = if byte_len == 0 {
            None
        } else {
            // SAFETY: stream files are never modified in place. A rewrite stages new
            // files and renames them over the old names, so this mapping keeps the
            // original file. The mapping is read-only and lives as long as any
            // clone of this reader.
            let map = unsafe { MmapOptions::new().map(&file) }
                .map_err(|e| stream_io_error("Failed to map stream file", e))?;
            Some(Arc::new(map))
        };

        Ok(Self { map, len, pos: 0 })
    }

    fn bytes(&self) -> &[u8] {
        self.map.as_deref().map_or(&[], |m| &m[..])
    }
}

impl UIntReader for MmapReader {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        let n = out.len().min(self.len - self.pos);
        let start = self.pos * WORD_BYTES;
        let bytes = &self.bytes()[start..start + n * WORD_BYTES];
        words_from_le_bytes(bytes, out)?;
        self.pos += n;
        Ok(n)
    }

    fn restart(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        if count > self.len - self.pos {
            self.pos = self.len;
            return Err(PackError::UnexpectedEndOfStream);
        }
        self.pos += count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmap_reads_le_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("row_starts.bin");
        std::fs::write(&path, [1u8, 0, 0, 0, 0xff, 0xff, 0, 0, 7, 0, 0, 0]).unwrap();

        let mut reader = MmapReader::open(&path).unwrap();
        assert_eq!(reader.len(), 3);
        let mut out = [0u32; 4];
        assert_eq!(reader.read(&mut out), Ok(3));
        assert_eq!(&out[..3], &[1, 0xffff, 7]);

        let mut other = reader.clone();
        other.restart().unwrap();
        other.skip(2).unwrap();
        assert_eq!(other.read_one(), Ok(7));
        assert_eq!(reader.read(&mut out), Ok(0));
    }

    #[test]
    fn test_mmap_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("val_data.bin");
        std::fs::write(&path, [0u8; 0]).unwrap();
        let mut reader = MmapReader::open(&path).unwrap();
        assert!(reader.is_empty());
        assert_eq!(reader.read(&mut [0u32; 2]), Ok(0));
    }
}
