//! Column-streaming sparse matrix protocol
//!
//! Matrix loaders are purely column-major. Entries need only be grouped by
//! column: neither row order within a column nor the presence of every column
//! is required, as long as all entries of one column are delivered together.
//! Transposition is only possible through a [`MatrixWriter`], since it needs
//! every entry stored in an intermediate matrix.
//!
//! Implementing a loader:
//! 1. `rows()`/`cols()` return the fixed dimensions.
//! 2. `next_col()` advances to the next column that has entries.
//! 3. `load()` copies the next chunk of the current column and returns 0
//!    repeatedly at the end of the column until `next_col()` is called.
//! 4. `restart()` rewinds to before the first column.

use super::element::MatrixValue;
use super::interrupt::InterruptCheck;
use crate::{PackError, Result};

/// Source of sparse matrix entries, one column at a time
pub trait MatrixLoader<T: MatrixValue = u32> {
    /// Number of rows
    fn rows(&self) -> u32;

    /// Number of columns
    fn cols(&self) -> u32;

    /// Name of `row`, if the matrix carries row names
    fn row_name(&self, row: u32) -> Option<&str> {
        let _ = row;
        None
    }

    /// Name of `col`, if the matrix carries column names
    fn col_name(&self, col: u32) -> Option<&str> {
        let _ = col;
        None
    }

    /// Rewind to before the first column
    fn restart(&mut self) -> Result<()>;

    /// Advance to the next column, returning `false` once past the last one
    fn next_col(&mut self) -> Result<bool>;

    /// Column most recently entered by `next_col`
    ///
    /// `None` before the first call and after the iterator is exhausted.
    fn current_col(&self) -> Option<u32>;

    /// Copy up to `count` entries of the current column into `rows`/`vals`
    ///
    /// Returns the number of entries written; 0 means the column is
    /// exhausted. `count` must be at least 1 and both buffers must hold at
    /// least `count` entries.
    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [T]) -> Result<usize>;
}

/// Sink that consumes a whole matrix in one pass
pub trait MatrixWriter<T: MatrixValue = u32> {
    /// Drive `loader` from `restart` to exhaustion, polling `interrupt`
    ///
    /// A failed or interrupted write leaves no usable output.
    fn write(&mut self, loader: &mut dyn MatrixLoader<T>, interrupt: &dyn InterruptCheck) -> Result<()>;
}

/// Check the count and buffers handed to [`MatrixLoader::load`]
///
/// A zero count is rejected so that `Ok(0)` always means end of column.
pub fn validate_load_request(count: usize, rows_len: usize, vals_len: usize) -> Result<()> {
    if count == 0 {
        return Err(PackError::EmptyRequest);
    }
    if count > rows_len || count > vals_len {
        return Err(PackError::InsufficientBuffer);
    }
    Ok(())
}

impl<T: MatrixValue, L: MatrixLoader<T> + ?Sized> MatrixLoader<T> for &mut L {
    fn rows(&self) -> u32 {
        (**self).rows()
    }

    fn cols(&self) -> u32 {
        (**self).cols()
    }

    fn row_name(&self, row: u32) -> Option<&str> {
        (**self).row_name(row)
    }

    fn col_name(&self, col: u32) -> Option<&str> {
        (**self).col_name(col)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }

    fn next_col(&mut self) -> Result<bool> {
        (**self).next_col()
    }

    fn current_col(&self) -> Option<u32> {
        (**self).current_col()
    }

    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [T]) -> Result<usize> {
        (**self).load(count, rows, vals)
    }
}

#[cfg(feature = "alloc")]
impl<T: MatrixValue, L: MatrixLoader<T> + ?Sized> MatrixLoader<T> for alloc::boxed::Box<L> {
    fn rows(&self) -> u32 {
        (**self).rows()
    }

    fn cols(&self) -> u32 {
        (**self).cols()
    }

    fn row_name(&self, row: u32) -> Option<&str> {
        (**self).row_name(row)
    }

    fn col_name(&self, col: u32) -> Option<&str> {
        (**self).col_name(col)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }

    fn next_col(&mut self) -> Result<bool> {
        (**self).next_col()
    }

    fn current_col(&self) -> Option<u32> {
        (**self).current_col()
    }

    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [T]) -> Result<usize> {
        (**self).load(count, rows, vals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single column holding rows 0..n with value = row + 1
    struct Ramp {
        n: u32,
        col: Option<u32>,
        done: bool,
        pos: u32,
    }

    impl MatrixLoader for Ramp {
        fn rows(&self) -> u32 {
            self.n
        }

        fn cols(&self) -> u32 {
            1
        }

        fn restart(&mut self) -> Result<()> {
            self.col = None;
            self.done = false;
            self.pos = 0;
            Ok(())
        }

        fn next_col(&mut self) -> Result<bool> {
            if self.done || self.col.is_some() {
                self.done = true;
                self.col = None;
                return Ok(false);
            }
            self.col = Some(0);
            Ok(true)
        }

        fn current_col(&self) -> Option<u32> {
            self.col
        }

        fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [u32]) -> Result<usize> {
            validate_load_request(count, rows.len(), vals.len())?;
            self.col.ok_or(PackError::NoCurrentColumn)?;
            let n = count.min((self.n - self.pos) as usize);
            for i in 0..n {
                rows[i] = self.pos;
                vals[i] = self.pos + 1;
                self.pos += 1;
            }
            Ok(n)
        }
    }

    fn drain(loader: &mut dyn MatrixLoader) -> u32 {
        let mut rows = [0u32; 3];
        let mut vals = [0u32; 3];
        let mut total = 0;
        while loader.next_col().unwrap() {
            loop {
                let n = loader.load(3, &mut rows, &mut vals).unwrap();
                if n == 0 {
                    break;
                }
                total += vals[..n].iter().sum::<u32>();
            }
        }
        total
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        let mut ramp = Ramp { n: 7, col: None, done: false, pos: 0 };
        let mut by_ref = &mut ramp;
        assert_eq!(drain(&mut by_ref), 28);
        assert_eq!(ramp.current_col(), None);
    }

    #[test]
    fn test_validate_load_request() {
        assert_eq!(validate_load_request(4, 4, 8), Ok(()));
        assert_eq!(validate_load_request(5, 4, 8), Err(PackError::InsufficientBuffer));
        assert_eq!(validate_load_request(5, 8, 4), Err(PackError::InsufficientBuffer));
        assert_eq!(validate_load_request(0, 8, 8), Err(PackError::EmptyRequest));
    }
}
