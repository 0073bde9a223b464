#![allow(dead_code)]

use packmat::{CscMatrix, MemoryMatrix, NeverInterrupt, PackConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

pub type Columns = Vec<Vec<(u32, u32)>>;

/// Random matrix with per-column entry counts up to `max_per_col`
///
/// Rows within a column are distinct but shuffled.
pub fn random_matrix(seed: u64, n_rows: u32, n_cols: u32, max_per_col: usize) -> CscMatrix<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut triplets = Vec::new();
    for col in 0..n_cols {
        let count = rng.gen_range(0..=max_per_col.min(n_rows as usize));
        let rows = rand::seq::index::sample(&mut rng, n_rows as usize, count);
        for row in rows.iter() {
            let value: u32 = match rng.gen_range(0..4) {
                0 => rng.gen(),
                1 => rng.gen_range(0..16),
                _ => rng.gen_range(1..1000),
            };
            triplets.push((row as u32, col, value));
        }
    }
    CscMatrix::from_triplets(n_rows, n_cols, &triplets).unwrap()
}

/// Matrix with the given columns
pub fn matrix_from_columns(n_rows: u32, columns: &Columns) -> CscMatrix<u32> {
    let triplets: Vec<_> = columns
        .iter()
        .enumerate()
        .flat_map(|(c, entries)| entries.iter().map(move |&(r, v)| (r, c as u32, v)))
        .collect();
    CscMatrix::from_triplets(n_rows, columns.len() as u32, &triplets).unwrap()
}

pub fn encode(matrix: &CscMatrix<u32>) -> MemoryMatrix {
    MemoryMatrix::encode(&mut matrix.loader(), &PackConfig::default(), &NeverInterrupt).unwrap()
}

/// Sort every column so order within a column does not matter
pub fn normalized(mut columns: Columns) -> Columns {
    for entries in &mut columns {
        entries.sort_unstable();
    }
    columns
}

/// Names of leftover `*.tmp` files in `dir`
pub fn staging_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}
