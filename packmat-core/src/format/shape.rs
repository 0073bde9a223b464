//! Matrix dimensions

/// Dimensions of a sparse matrix, fixed for the lifetime of a reader or writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixShape {
    /// Number of rows
    pub n_rows: u32,
    /// Number of columns
    pub n_cols: u32,
}

impl MatrixShape {
    /// Create a shape
    pub const fn new(n_rows: u32, n_cols: u32) -> Self {
        Self { n_rows, n_cols }
    }

    /// Check that `(row, col)` lies inside the matrix
    pub const fn contains(&self, row: u32, col: u32) -> bool {
        row < self.n_rows && col < self.n_cols
    }
}

impl core::fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} x {}", self.n_rows, self.n_cols)
    }
}
