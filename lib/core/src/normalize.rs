//! Row normalization applied before scoring.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::kernel::soft_product;
use crate::sparse::SparseMatrix;

/// Norm used to rescale each row vector before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalize {
    /// Identity; rows are scored as given.
    #[default]
    None,
    /// Divide each row by its Euclidean norm. Dot products of l2-normalized
    /// rows are cosine similarities.
    L2,
    /// Divide row v by sqrt(v' S v) against a feature-adjacency matrix S.
    /// Paired with the soft-product kernel this yields soft cosine.
    SoftL2,
}

impl FromStr for Normalize {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Normalize::None),
            "l2" => Ok(Normalize::L2),
            "softl2" => Ok(Normalize::SoftL2),
            other => Err(MatrixError::UnknownToken {
                kind: "normalize",
                token: other.to_string(),
            }),
        }
    }
}

/// New matrix with each row rescaled by the selected norm; the input is
/// never mutated. Rows whose norm is zero (or whose soft quadratic form is
/// not positive) stay all-zero, so any score involving them is 0.
///
/// # Errors
///
/// `SoftL2` without an adjacency matrix is a configuration error.
pub fn normalize_rows(
    m: &SparseMatrix,
    mode: Normalize,
    adjacency: Option<&SparseMatrix>,
) -> Result<SparseMatrix> {
    match mode {
        Normalize::None => Ok(m.clone()),
        Normalize::L2 => {
            let factors: Vec<f64> = m
                .row_norms()
                .into_iter()
                .map(|n| if n > 0.0 { 1.0 / n } else { 0.0 })
                .collect();
            m.scale_rows(&factors)
        }
        Normalize::SoftL2 => {
            let adj = adjacency.ok_or(MatrixError::MissingAdjacency("softl2"))?;
            let by_row = m.transpose();
            let mut factors = Vec::with_capacity(m.rows());
            for i in 0..m.rows() {
                let (idx, vals) = by_row.col(i);
                let quad = soft_product(idx, vals, idx, vals, adj);
                factors.push(if quad > 0.0 { 1.0 / quad.sqrt() } else { 0.0 });
            }
            m.scale_rows(&factors)
        }
    }
}
