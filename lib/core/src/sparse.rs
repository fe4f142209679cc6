//! Compressed sparse column storage.
//!
//! A [`SparseMatrix`] stores nonzero entries by column, with each column's row
//! indices sorted ascending. This is the canonical representation for both the
//! input term-document matrices and the engine's score output. Matrices are
//! immutable once built; every transform returns a new matrix.

use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};

/// A sparse row x feature matrix in compressed sparse column (CSC) form.
///
/// Invariants:
/// - `col_ptr` has `cols + 1` entries, monotonically non-decreasing
/// - row indices within a column are sorted ascending, without duplicates
/// - no explicit zero values are stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<u32>,
    values: Vec<f64>,
}

impl SparseMatrix {
    /// Build a matrix from (row, col, value) triplets.
    ///
    /// Triplets may arrive in any order; they are sorted into canonical
    /// column-major, row-ascending order. Explicit zeros are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::OutOfBounds`] if any triplet falls outside the
    /// declared shape, and [`MatrixError::DuplicateEntry`] if the same
    /// (row, col) pair appears more than once.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(u32, u32, f64)]) -> Result<Self> {
        let mut entries: Vec<(u32, u32, f64)> = Vec::with_capacity(triplets.len());
        for &(r, c, v) in triplets {
            if (r as usize) >= rows || (c as usize) >= cols {
                return Err(MatrixError::OutOfBounds {
                    row: r,
                    col: c,
                    rows,
                    cols,
                });
            }
            if v != 0.0 {
                entries.push((r, c, v));
            }
        }
        entries.sort_unstable_by_key(|&(r, c, _)| (c, r));
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 && pair[0].1 == pair[1].1 {
                return Err(MatrixError::DuplicateEntry(pair[0].0, pair[0].1));
            }
        }

        let mut col_ptr = vec![0usize; cols + 1];
        for &(_, c, _) in &entries {
            col_ptr[c as usize + 1] += 1;
        }
        for j in 0..cols {
            col_ptr[j + 1] += col_ptr[j];
        }
        let row_idx = entries.iter().map(|&(r, _, _)| r).collect();
        let values = entries.iter().map(|&(_, _, v)| v).collect();

        Ok(Self {
            rows,
            cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// An all-zero matrix of the given shape.
    #[must_use]
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            col_ptr: vec![0; cols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored nonzero entries.
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sorted (row indices, values) slices of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= cols`.
    #[inline]
    #[must_use]
    pub fn col(&self, j: usize) -> (&[u32], &[f64]) {
        let start = self.col_ptr[j];
        let end = self.col_ptr[j + 1];
        (&self.row_idx[start..end], &self.values[start..end])
    }

    /// Value at (r, c), or 0.0 when not stored.
    #[must_use]
    pub fn get(&self, r: u32, c: usize) -> f64 {
        let (idx, vals) = self.col(c);
        match idx.binary_search(&r) {
            Ok(pos) => vals[pos],
            Err(_) => 0.0,
        }
    }

    /// Transposed copy. Columns of the result are the rows of `self`,
    /// so `transpose().col(i)` is row `i` as a sorted sparse vector.
    #[must_use]
    pub fn transpose(&self) -> SparseMatrix {
        let nnz = self.nnz();
        let mut col_ptr = vec![0usize; self.rows + 1];
        for &r in &self.row_idx {
            col_ptr[r as usize + 1] += 1;
        }
        for i in 0..self.rows {
            col_ptr[i + 1] += col_ptr[i];
        }

        let mut next = col_ptr.clone();
        let mut row_idx = vec![0u32; nnz];
        let mut values = vec![0.0f64; nnz];
        for j in 0..self.cols {
            for idx in self.col_ptr[j]..self.col_ptr[j + 1] {
                let r = self.row_idx[idx] as usize;
                let pos = next[r];
                next[r] += 1;
                // j ascends, so each output column stays sorted
                row_idx[pos] = j as u32;
                values[pos] = self.values[idx];
            }
        }

        SparseMatrix {
            rows: self.cols,
            cols: self.rows,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Sum of each row's values, in storage order.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        let mut out = vec![0.0f64; self.rows];
        for (idx, &r) in self.row_idx.iter().enumerate() {
            out[r as usize] += self.values[idx];
        }
        out
    }

    /// Euclidean norm of each row.
    #[must_use]
    pub fn row_norms(&self) -> Vec<f64> {
        let mut out = vec![0.0f64; self.rows];
        for (idx, &r) in self.row_idx.iter().enumerate() {
            out[r as usize] += self.values[idx] * self.values[idx];
        }
        for v in &mut out {
            *v = v.sqrt();
        }
        out
    }

    /// New matrix with every entry of row `r` multiplied by `factors[r]`.
    /// Entries scaled to zero are dropped from storage.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ScaleLength`] when `factors.len() != rows`.
    pub fn scale_rows(&self, factors: &[f64]) -> Result<SparseMatrix> {
        if factors.len() != self.rows {
            return Err(MatrixError::ScaleLength {
                got: factors.len(),
                expected: self.rows,
            });
        }

        let mut col_ptr = vec![0usize; self.cols + 1];
        let mut row_idx = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());
        for j in 0..self.cols {
            for idx in self.col_ptr[j]..self.col_ptr[j + 1] {
                let r = self.row_idx[idx];
                let v = self.values[idx] * factors[r as usize];
                if v != 0.0 {
                    row_idx.push(r);
                    values.push(v);
                }
            }
            col_ptr[j + 1] = values.len();
        }

        Ok(SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// All stored entries as (row, col, value) triplets in canonical
    /// column-major, row-ascending order.
    #[must_use]
    pub fn triplets(&self) -> Vec<(u32, u32, f64)> {
        let mut out = Vec::with_capacity(self.nnz());
        for j in 0..self.cols {
            for idx in self.col_ptr[j]..self.col_ptr[j + 1] {
                out.push((self.row_idx[idx], j as u32, self.values[idx]));
            }
        }
        out
    }
}

/// Pruned copy of a feature-adjacency matrix.
///
/// Entries outside `[0, 1]` or below `threshold` are treated as zero and
/// dropped. The matrix must be square (feature x feature); symmetry is the
/// caller's contract and is not verified entry by entry.
pub fn prune_adjacency(adjacency: &SparseMatrix, threshold: f64) -> Result<SparseMatrix> {
    if adjacency.rows() != adjacency.cols() {
        return Err(MatrixError::NotSquare {
            rows: adjacency.rows(),
            cols: adjacency.cols(),
        });
    }

    let kept: Vec<(u32, u32, f64)> = adjacency
        .triplets()
        .into_iter()
        .filter(|&(_, _, v)| v > 0.0 && v <= 1.0 && v >= threshold)
        .collect();
    SparseMatrix::from_triplets(adjacency.rows(), adjacency.cols(), &kept)
}
