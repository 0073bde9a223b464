//! Stream a packed directory back column by column

use packmat::{MatrixLoader, PackConfig, PackedDir};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> packmat::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "example_matrix".to_string());
    let config = PackConfig::default();
    let stored = PackedDir::open(&path, &config)?;
    println!("Opened {path}: {} with {} entries", stored.shape(), stored.manifest().nnz);

    let start = Instant::now();
    let mut reader = stored.reader()?;
    let mut rows = vec![0u32; 1024];
    let mut vals = vec![0u32; 1024];
    let mut busiest = (0u32, 0u64);
    let mut total = 0u64;

    while reader.next_col()? {
        let mut col_sum = 0u64;
        loop {
            let n = reader.load(rows.len(), &mut rows, &mut vals)?;
            if n == 0 {
                break;
            }
            col_sum += vals[..n].iter().map(|&v| v as u64).sum::<u64>();
        }
        total += col_sum;
        if col_sum > busiest.1 {
            busiest = (reader.current_col().unwrap_or_default(), col_sum);
        }
    }

    let name = reader.col_name(busiest.0).unwrap_or("<unnamed>");
    println!("Read all columns in {:?}; total count {total}", start.elapsed());
    println!("Largest column: {} ({name}) with total {}", busiest.0, busiest.1);
    Ok(())
}
