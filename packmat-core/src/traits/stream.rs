//! Sequential integer stream contract
//!
//! The codec only needs to read or append `u32` words in order, with one
//! cursor per stream. Backends (memory, files, memory maps) implement these.

use crate::{PackError, Result};

/// Sequential reader of stored `u32` words
pub trait UIntReader {
    /// Total number of words in the stream
    fn len(&self) -> usize;

    /// Whether the stream holds no words
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read up to `out.len()` words, returning how many were read
    ///
    /// Returns 0 only at the end of the stream.
    fn read(&mut self, out: &mut [u32]) -> Result<usize>;

    /// Rewind the cursor to the first word
    fn restart(&mut self) -> Result<()>;

    /// Fill `out` completely
    fn read_exact(&mut self, out: &mut [u32]) -> Result<()> {
        let mut filled = 0;
        while filled < out.len() {
            let n = self.read(&mut out[filled..])?;
            if n == 0 {
                return Err(PackError::UnexpectedEndOfStream);
            }
            filled += n;
        }
        Ok(())
    }

    /// Read a single word
    fn read_one(&mut self) -> Result<u32> {
        let mut word = [0u32; 1];
        self.read_exact(&mut word)?;
        Ok(word[0])
    }

    /// Advance the cursor past `count` words
    ///
    /// The default reads and discards; backends with cheap seeks override it.
    fn skip(&mut self, count: usize) -> Result<()> {
        let mut scratch = [0u32; 64];
        let mut left = count;
        while left > 0 {
            let step = left.min(scratch.len());
            self.read_exact(&mut scratch[..step])?;
            left -= step;
        }
        Ok(())
    }
}

/// Sequential writer of `u32` words
pub trait UIntWriter {
    /// Append `values` to the stream
    fn write(&mut self, values: &[u32]) -> Result<()>;

    /// Flush and close the stream; no writes may follow
    fn finalize(&mut self) -> Result<()>;

    /// Append a single word
    fn write_one(&mut self, value: u32) -> Result<()> {
        self.write(&[value])
    }
}

impl<R: UIntReader + ?Sized> UIntReader for &mut R {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        (**self).read(out)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        (**self).skip(count)
    }
}

impl<W: UIntWriter + ?Sized> UIntWriter for &mut W {
    fn write(&mut self, values: &[u32]) -> Result<()> {
        (**self).write(values)
    }

    fn finalize(&mut self) -> Result<()> {
        (**self).finalize()
    }
}

#[cfg(feature = "alloc")]
impl<R: UIntReader + ?Sized> UIntReader for alloc::boxed::Box<R> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&mut self, out: &mut [u32]) -> Result<usize> {
        (**self).read(out)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        (**self).skip(count)
    }
}

#[cfg(feature = "alloc")]
impl<W: UIntWriter + ?Sized> UIntWriter for alloc::boxed::Box<W> {
    fn write(&mut self, values: &[u32]) -> Result<()> {
        (**self).write(values)
    }

    fn finalize(&mut self) -> Result<()> {
        (**self).finalize()
    }
}
