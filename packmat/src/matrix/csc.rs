//! Compressed sparse column matrix held in memory

use crate::labels::LabelSet;
use packmat_core::{
    validate_load_request, InterruptCheck, MatrixLoader, MatrixShape, MatrixValue, MatrixWriter, PackError, Result,
};
use tracing::debug;

/// Column-compressed sparse matrix
///
/// Entries keep the order they were supplied in within each column.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T> {
    shape: MatrixShape,
    col_ptr: Vec<usize>,
    row_idx: Vec<u32>,
    values: Vec<T>,
    row_names: Option<LabelSet>,
    col_names: Option<LabelSet>,
}

impl<T: MatrixValue> CscMatrix<T> {
    /// Build from `(row, col, value)` triplets in any column order
    pub fn from_triplets(n_rows: u32, n_cols: u32, triplets: &[(u32, u32, T)]) -> Result<Self> {
        let shape = MatrixShape::new(n_rows, n_cols);
        let mut col_ptr = vec![0usize; n_cols as usize + 1];
        for &(row, col, _) in triplets {
            if !shape.contains(row, col) {
                return Err(PackError::IndexOutOfBounds);
            }
            col_ptr[col as usize + 1] += 1;
        }
        for c in 0..n_cols as usize {
            col_ptr[c + 1] += col_ptr[c];
        }

        // Stable counting sort by column
        let mut fill = col_ptr.clone();
        let mut row_idx = vec![0u32; triplets.len()];
        let mut values = vec![T::default(); triplets.len()];
        for &(row, col, value) in triplets {
            let slot = &mut fill[col as usize];
            row_idx[*slot] = row;
            values[*slot] = value;
            *slot += 1;
        }

        Ok(Self {
            shape,
            col_ptr,
            row_idx,
            values,
            row_names: None,
            col_names: None,
        })
    }

    /// Attach row names
    pub fn with_row_names(mut self, names: LabelSet) -> Result<Self> {
        names.check_len(self.shape.n_rows)?;
        self.row_names = Some(names);
        Ok(self)
    }

    /// Attach column names
    pub fn with_col_names(mut self, names: LabelSet) -> Result<Self> {
        names.check_len(self.shape.n_cols)?;
        self.col_names = Some(names);
        Ok(self)
    }

    pub fn shape(&self) -> MatrixShape {
        self.shape
    }

    /// Stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Rows and values of column `col`
    pub fn column(&self, col: u32) -> Option<(&[u32], &[T])> {
        let start = *self.col_ptr.get(col as usize)?;
        let end = *self.col_ptr.get(col as usize + 1)?;
        Some((&self.row_idx[start..end], &self.values[start..end]))
    }

    /// Value at `(row, col)`, first match if the column repeats a row
    pub fn get(&self, row: u32, col: u32) -> Option<T> {
        let (rows, vals) = self.column(col)?;
        rows.iter().position(|&r| r == row).map(|i| vals[i])
    }

    /// Column iterator borrowing this matrix
    pub fn loader(&self) -> CscLoader<'_, T> {
        CscLoader {
            matrix: self,
            col: None,
            next: 0,
            pos: 0,
        }
    }
}

/// Column loader over a [`CscMatrix`]
///
/// Visits only non-empty columns.
#[derive(Debug, Clone)]
pub struct CscLoader<'a, T> {
    matrix: &'a CscMatrix<T>,
    col: Option<u32>,
    /// First column not yet visited
    next: u32,
    /// Offset of the next entry to deliver
    pos: usize,
}

impl<T: MatrixValue> MatrixLoader<T> for CscLoader<'_, T> {
    fn rows(&self) -> u32 {
        self.matrix.shape.n_rows
    }

    fn cols(&self) -> u32 {
        self.matrix.shape.n_cols
    }

    fn row_name(&self, row: u32) -> Option<&str> {
        self.matrix.row_names.as_ref()?.get(row)
    }

    fn col_name(&self, col: u32) -> Option<&str> {
        self.matrix.col_names.as_ref()?.get(col)
    }

    fn restart(&mut self) -> Result<()> {
        self.col = None;
        self.next = 0;
        self.pos = 0;
        Ok(())
    }

    fn next_col(&mut self) -> Result<bool> {
        let col_ptr = &self.matrix.col_ptr;
        while self.next < self.matrix.shape.n_cols {
            let col = self.next;
            self.next += 1;
            if col_ptr[col as usize + 1] > col_ptr[col as usize] {
                self.col = Some(col);
                self.pos = col_ptr[col as usize];
                return Ok(true);
            }
        }
        self.col = None;
        Ok(false)
    }

    fn current_col(&self) -> Option<u32> {
        self.col
    }

    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [T]) -> Result<usize> {
        validate_load_request(count, rows.len(), vals.len())?;
        let col = self.col.ok_or(PackError::NoCurrentColumn)?;
        let end = self.matrix.col_ptr[col as usize + 1];
        let n = count.min(end - self.pos);
        rows[..n].copy_from_slice(&self.matrix.row_idx[self.pos..self.pos + n]);
        vals[..n].copy_from_slice(&self.matrix.values[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Writer that materializes any loader into a [`CscMatrix`]
#[derive(Debug, Default)]
pub struct CscWriter<T> {
    matrix: Option<CscMatrix<T>>,
}

impl<T: MatrixValue> CscWriter<T> {
    pub fn new() -> Self {
        Self { matrix: None }
    }

    /// The written matrix, if a write succeeded
    pub fn into_matrix(self) -> Option<CscMatrix<T>> {
        self.matrix
    }
}

impl<T: MatrixValue> MatrixWriter<T> for CscWriter<T> {
    fn write(&mut self, loader: &mut dyn MatrixLoader<T>, interrupt: &dyn InterruptCheck) -> Result<()> {
        self.matrix = None;
        loader.restart()?;
        let shape = MatrixShape::new(loader.rows(), loader.cols());
        let mut col_ptr = vec![0usize; shape.n_cols as usize + 1];
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        let mut rows = [0u32; 128];
        let mut vals = [T::default(); 128];
        let mut next_col = 0u32;

        while loader.next_col()? {
            let col = loader.current_col().ok_or(PackError::NoCurrentColumn)?;
            if col < next_col {
                return Err(PackError::ColumnOrder);
            }
            if col >= shape.n_cols {
                return Err(PackError::IndexOutOfBounds);
            }
            for c in next_col..col {
                col_ptr[c as usize + 1] = row_idx.len();
            }
            loop {
                let n = loader.load(rows.len(), &mut rows, &mut vals)?;
                if n == 0 {
                    break;
                }
                if rows[..n].iter().any(|&r| r >= shape.n_rows) {
                    return Err(PackError::IndexOutOfBounds);
                }
                row_idx.extend_from_slice(&rows[..n]);
                values.extend_from_slice(&vals[..n]);
            }
            col_ptr[col as usize + 1] = row_idx.len();
            next_col = col + 1;
            if interrupt.should_stop() {
                return Err(PackError::Interrupted);
            }
        }
        for c in next_col..shape.n_cols {
            col_ptr[c as usize + 1] = row_idx.len();
        }

        let source: &dyn MatrixLoader<T> = loader;
        let row_names = LabelSet::collect(shape.n_rows, |r| source.row_name(r))?;
        let col_names = LabelSet::collect(shape.n_cols, |c| source.col_name(c))?;
        debug!(%shape, nnz = values.len(), "materialized matrix");
        self.matrix = Some(CscMatrix {
            shape,
            col_ptr,
            row_idx,
            values,
            row_names,
            col_names,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::read_columns;
    use packmat_core::NeverInterrupt;

    #[test]
    fn test_triplets_group_by_column() {
        let m = CscMatrix::from_triplets(4, 3, &[(3, 2, 1i32), (0, 0, 2), (1, 2, 3), (2, 0, 4)]).unwrap();
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.column(0), Some((&[0, 2][..], &[2, 4][..])));
        assert_eq!(m.column(1), Some((&[][..], &[][..])));
        assert_eq!(m.column(2), Some((&[3, 1][..], &[1, 3][..])));
        assert_eq!(m.column(3), None);
        assert_eq!(m.get(1, 2), Some(3));
        assert_eq!(m.get(1, 1), None);
    }

    #[test]
    fn test_triplet_bounds() {
        assert_eq!(
            CscMatrix::from_triplets(2, 2, &[(2, 0, 1u32)]).unwrap_err(),
            PackError::IndexOutOfBounds
        );
        assert_eq!(
            CscMatrix::from_triplets(2, 2, &[(0, 2, 1u32)]).unwrap_err(),
            PackError::IndexOutOfBounds
        );
    }

    #[test]
    fn test_loader_skips_empty_columns() {
        let m = CscMatrix::from_triplets(3, 4, &[(1, 1, 10u64), (2, 3, 20)]).unwrap();
        let mut loader = m.loader();
        let mut rows = [0u32; 4];
        let mut vals = [0u64; 4];

        assert!(loader.next_col().unwrap());
        assert_eq!(loader.current_col(), Some(1));
        assert_eq!(loader.load(4, &mut rows, &mut vals), Ok(1));
        assert_eq!(loader.load(4, &mut rows, &mut vals), Ok(0));
        assert!(loader.next_col().unwrap());
        assert_eq!(loader.current_col(), Some(3));
        assert!(!loader.next_col().unwrap());
        assert_eq!(loader.current_col(), None);
        assert_eq!(loader.load(4, &mut rows, &mut vals), Err(PackError::NoCurrentColumn));
    }

    #[test]
    fn test_writer_copies_matrix_and_names() {
        let m = CscMatrix::from_triplets(2, 3, &[(1, 0, 0.5f32), (0, 2, 1.5)])
            .unwrap()
            .with_col_names(LabelSet::new(vec!["a".into(), "b".into(), "c".into()]).unwrap())
            .unwrap();
        let mut writer = CscWriter::new();
        writer.write(&mut m.loader(), &NeverInterrupt).unwrap();
        let copy = writer.into_matrix().unwrap();
        assert_eq!(copy, m);
        assert_eq!(
            read_columns(&mut copy.loader()).unwrap(),
            vec![vec![(1, 0.5)], vec![], vec![(0, 1.5)]]
        );
    }
}
