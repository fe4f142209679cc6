//! Final assembly of surviving triples into the score matrix.

use crosswin_core::SparseMatrix;

use crate::error::Result;

/// Build the output score matrix from the surviving (row, col, score)
/// triples of all batches. Exact zeros are dropped so the sparse invariant
/// (no explicit zeros) holds; `from_triplets` establishes the canonical
/// column-major, row-ascending order. Each (row, col) pair comes from
/// exactly one batch by construction.
pub fn assemble(rows: usize, cols: usize, mut triples: Vec<(u32, u32, f64)>) -> Result<SparseMatrix> {
    triples.retain(|&(_, _, v)| v != 0.0);
    Ok(SparseMatrix::from_triplets(rows, cols, &triples)?)
}
