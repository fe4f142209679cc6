use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Entry ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: usize,
        cols: usize,
    },

    #[error("Duplicate entry at ({0}, {1})")]
    DuplicateEntry(u32, u32),

    #[error("Row scale factors have length {got}, expected {expected}")]
    ScaleLength { got: usize, expected: usize },

    #[error("Adjacency matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("'{0}' requires an adjacency matrix")]
    MissingAdjacency(&'static str),

    #[error("Unknown {kind} token: '{token}'")]
    UnknownToken { kind: &'static str, token: String },
}
