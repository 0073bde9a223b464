//! In-memory matrices and helpers over the column protocol

pub mod csc;

pub use csc::{CscLoader, CscMatrix, CscWriter};

use packmat_core::{MatrixLoader, MatrixValue, Result};

/// Entries requested per `load` call by [`read_columns`]
const READ_CHUNK: usize = 256;

/// Materialize every column of `loader` as `(row, value)` pairs
///
/// The result has one entry per column, in column order; columns the loader
/// never visits stay empty.
pub fn read_columns<T: MatrixValue>(loader: &mut dyn MatrixLoader<T>) -> Result<Vec<Vec<(u32, T)>>> {
    loader.restart()?;
    let mut columns = vec![Vec::new(); loader.cols() as usize];
    let mut rows = vec![0u32; READ_CHUNK];
    let mut vals = vec![T::default(); READ_CHUNK];

    while loader.next_col()? {
        let col = loader.current_col().ok_or(packmat_core::PackError::NoCurrentColumn)?;
        let entries = columns
            .get_mut(col as usize)
            .ok_or(packmat_core::PackError::IndexOutOfBounds)?;
        loop {
            let n = loader.load(READ_CHUNK, &mut rows, &mut vals)?;
            if n == 0 {
                break;
            }
            entries.extend(rows[..n].iter().copied().zip(vals[..n].iter().copied()));
        }
    }
    Ok(columns)
}
