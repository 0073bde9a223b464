//! In-memory integer streams

use packmat_core::{PackError, Result, UIntReader, UIntWriter};
use std::sync::Arc;

/// Growable in-memory stream
#[derive(Debug, Clone, Default)]
pub struct VecWriter {
    data: Vec<u32>,
    finalized: bool,
}

impl VecWriter {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `capacity` words
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            finalized: false,
        }
    }

    /// Words written so far
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Take the written words
    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }

    /// Freeze the written words into a shareable reader
    pub fn into_reader(self) -> SliceReader {
        SliceReader::new(self.data.into())
    }
}

impl UIntWriter for VecWriter {
    fn write(&mut self, values: &[u32]) -> Result<()> {
        if self.finalized {
            return Err(PackError::WriterClosed);
        }
        self.data.extend_from_slice(values);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(PackError::WriterClosed);
        }
        self.finalized = true;
        self.data.shrink_to_fit();
        Ok(())
    }
}

/// Cursor over shared immutable words
///
/// Clones share the words but carry their own cursor.
#[derive(Debug, Clone)]
pub struct SliceReader {
    data: Arc<[u32]>,
    pos: usize,
}

impl SliceReader {
    /// Reader positioned at the first word
    pub fn new(data: Arc<[u32]>) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset in words
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The shared words
    pub fn data(&self) -> &Arc<[u32]> {
        &self.data
    }
}

impl From<Vec<u32>> for SliceReader {
    fn from(data: Vec<u32>) -> Self {
        Self::new(data.into())
    }
}

impl UIntReader for SliceReader {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        let rest = &self.data[self.pos..];
        let n = out.len().min(rest.len());
        out[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn restart(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        if count > self.data.len() - self.pos {
            self.pos = self.data.len();
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
    fn test_write_then_read() {
        let mut writer = VecWriter::new();
        writer.write(&[1, 2, 3]).unwrap();
        writer.write_one(4).unwrap();
        writer.finalize().unwrap();
        assert_eq!(writer.write_one(5), Err(PackError::WriterClosed));

        let mut reader = writer.into_reader();
        assert_eq!(reader.len(), 4);
        let mut out = [0u32; 3];
        assert_eq!(reader.read(&mut out), Ok(3));
        assert_eq!(out, [1, 2, 3]);
        assert_eq!(reader.read(&mut out), Ok(1));
        assert_eq!(reader.read(&mut out), Ok(0));

        reader.restart().unwrap();
        reader.skip(2).unwrap();
        assert_eq!(reader.read_one(), Ok(3));
        assert_eq!(reader.skip(5), Err(PackError::UnexpectedEndOfStream));
    }

    #[test]
    fn test_clones_have_independent_cursors() {
        let a = SliceReader::from(vec![7, 8, 9]);
        let mut b = a.clone();
        b.skip(2).unwrap();
        assert_eq!(a.position(), 0);
        assert_eq!(b.position(), 2);
        assert!(Arc::ptr_eq(a.data(), b.data()));
    }
}
