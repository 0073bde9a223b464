//! Replace, keep or clear the dimension names of a loader

use crate::labels::LabelSet;
use packmat_core::{MatrixLoader, MatrixValue, PackError, Result};
use std::marker::PhantomData;

/// What to do with one dimension's names
#[derive(Debug, Clone, Default)]
pub enum Rename {
    /// Pass the inner loader's names through
    #[default]
    Keep,
    /// Report these names instead
    Replace(LabelSet),
    /// Report no names
    Clear,
}

impl Rename {
    fn check(&self, len: u32) -> Result<()> {
        match self {
            Rename::Replace(labels) => labels.check_len(len),
            Rename::Keep | Rename::Clear => Ok(()),
        }
    }

    fn resolve<'a>(&'a self, index: u32, inner: impl FnOnce() -> Option<&'a str>) -> Option<&'a str> {
        match self {
            Rename::Keep => inner(),
            Rename::Replace(labels) => labels.get(index),
            Rename::Clear => None,
        }
    }
}

/// Loader with overridden row and column names
///
/// Matrix data passes through untouched.
#[derive(Debug)]
pub struct RenameDims<L, T = u32> {
    inner: L,
    rows: Rename,
    cols: Rename,
    _value: PhantomData<fn() -> T>,
}

impl<T: MatrixValue, L: MatrixLoader<T>> RenameDims<L, T> {
    /// Wrap `inner`, checking replacement names against its dimensions
    pub fn new(inner: L, rows: Rename, cols: Rename) -> Result<Self> {
        rows.check(inner.rows())?;
        cols.check(inner.cols())?;
        Ok(Self {
            inner,
            rows,
            cols,
            _value: PhantomData,
        })
    }

    /// Wrap `inner` from plain name lists
    ///
    /// An empty list keeps the inner names. A non-empty list must match the
    /// dimension and may not be combined with clearing that dimension.
    pub fn from_names(
        inner: L,
        row_names: Vec<String>,
        col_names: Vec<String>,
        clear_row_names: bool,
        clear_col_names: bool,
    ) -> Result<Self> {
        let rows = Self::rename_from(row_names, clear_row_names)?;
        let cols = Self::rename_from(col_names, clear_col_names)?;
        Self::new(inner, rows, cols)
    }

    fn rename_from(names: Vec<String>, clear: bool) -> Result<Rename> {
        match (names.is_empty(), clear) {
            (true, false) => Ok(Rename::Keep),
            (true, true) => Ok(Rename::Clear),
            (false, true) => Err(PackError::ConflictingLabels),
            (false, false) => LabelSet::new(names).map(Rename::Replace),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<T: MatrixValue, L: MatrixLoader<T>> MatrixLoader<T> for RenameDims<L, T> {
    fn rows(&self) -> u32 {
        self.inner.rows()
    }

    fn cols(&self) -> u32 {
        self.inner.cols()
    }

    fn row_name(&self, row: u32) -> Option<&str> {
        self.rows.resolve(row, || self.inner.row_name(row))
    }

    fn col_name(&self, col: u32) -> Option<&str> {
        self.cols.resolve(col, || self.inner.col_name(col))
    }

    fn restart(&mut self) -> Result<()> {
        self.inner.restart()
    }

    fn next_col(&mut self) -> Result<bool> {
        self.inner.next_col()
    }

    fn current_col(&self) -> Option<u32> {
        self.inner.current_col()
    }

    fn load(&mut self, count: usize, rows: &mut [u32], vals: &mut [T]) -> Result<usize> {
        self.inner.load(count, rows, vals)
    }
}
