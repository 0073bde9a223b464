//! Encode a synthetic gene-by-cell count matrix into a packed directory

use packmat::{CancellationToken, CscMatrix, LabelSet, PackConfig, PackedDir};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> packmat::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let n_genes = 30_000u32;
    let n_cells = 5_000u32;
    let genes_per_cell = 1_500u32;
    println!("Matrix dimensions: {n_genes} genes x {n_cells} cells");

    let start = Instant::now();
    let triplets = build_demo_counts(n_genes, n_cells, genes_per_cell);
    let cell_names = (0..n_cells).map(|c| format!("cell_{c:05}-1")).collect();
    let counts = CscMatrix::from_triplets(n_genes, n_cells, &triplets)?.with_col_names(LabelSet::new(cell_names)?)?;
    println!("Built {} entries in {:?}", counts.nnz(), start.elapsed());

    // Ctrl-C handling would call token.cancel() from another thread
    let token = CancellationToken::new();
    let start = Instant::now();
    let summary = PackedDir::write("example_matrix", &mut counts.loader(), &PackConfig::default(), &token)?;
    println!(
        "Wrote {} blocks in {:?} ({:.2} bits per entry)",
        summary.blocks,
        start.elapsed(),
        summary.bits_per_entry()
    );
    println!("\nRun 'cargo run --example read_matrix' to read it back!");
    Ok(())
}

/// Deterministic counts: each cell expresses a strided run of genes
fn build_demo_counts(n_genes: u32, n_cells: u32, genes_per_cell: u32) -> Vec<(u32, u32, u32)> {
    let mut triplets = Vec::with_capacity((n_cells * genes_per_cell) as usize);
    for cell in 0..n_cells {
        let stride = 1 + cell % 7;
        for i in 0..genes_per_cell {
            let gene = (cell * 13 + i * stride) % n_genes;
            let count = 1 + (gene ^ cell) % 31;
            triplets.push((gene, cell, count));
        }
    }
    triplets
}
