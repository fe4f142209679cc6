//! Engine error taxonomy.
//!
//! Everything here is a caller-input error: either invalid inputs
//! (validation) or an invalid option combination (configuration). All are
//! raised before any scoring begins, so a failed call never produces a
//! partial result.

use thiserror::Error;

use crosswin_core::MatrixError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{what} has {got} entries, expected {expected} (one per row)")]
    LengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("'{given}' requires '{missing}' when comparing two matrices")]
    MissingCounterpart {
        given: &'static str,
        missing: &'static str,
    },

    #[error("Feature count mismatch: m has {0} columns, m2 has {1}")]
    ColumnMismatch(usize, usize),

    #[error("Adjacency matrix must be {expected}x{expected}, got {rows}x{cols}")]
    AdjacencyDimension {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Option '{0}' requires m and m2 to have the same number of rows")]
    SymmetricOnly(&'static str),

    #[error("max_value {max} is below min_value {min}")]
    InvalidRange { min: f64, max: f64 },

    #[error("Option '{0}' must be positive")]
    NonPositive(&'static str),

    #[error("Invalid matrix input: {0}")]
    Matrix(#[from] MatrixError),
}
