//! # crosswin
//!
//! A windowed sparse-matrix cross-similarity engine for document comparison.
//!
//! crosswin computes pairwise similarity scores between the rows of sparse
//! term-document matrices, restricted to row pairs allowed by optional
//! group and time-window constraints, and filtered on the fly so the full
//! dense similarity matrix is never materialized.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install crosswin
//! crosswin job.json --output scores.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use crosswin::prelude::*;
//!
//! // [[1, 1, 0],
//! //  [0, 1, 1]]
//! let m = SparseMatrix::from_triplets(2, 3, &[
//!     (0, 0, 1.0), (0, 1, 1.0),
//!     (1, 1, 1.0), (1, 2, 1.0),
//! ]).unwrap();
//!
//! let options = CrossOptions {
//!     normalize: Normalize::L2,
//!     min_value: Some(0.1),
//!     ..Default::default()
//! };
//! let scores = cross_similarity(&m, None, &options).unwrap();
//! assert_eq!(scores.rows(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - [`crosswin-core`](https://docs.rs/crosswin-core) - Sparse matrices, pair kernels, normalization
//! - [`crosswin-engine`](https://docs.rs/crosswin-engine) - Window index, batch scheduling, filtering, assembly
//!
//! ## Features
//!
//! - **Pluggable kernels**: dot product, min-sum overlap, soft product, max-product
//! - **Window pruning**: group and timestamp constraints cut the candidate space
//!   before scoring
//! - **Bounded memory**: fixed-size row batches instead of a full cross product
//! - **Deterministic parallelism**: identical output for any rayon thread count

// Re-export core types
pub use crosswin_core::{
    normalize_rows, prune_adjacency, soft_product, sparse_dot, sparse_max_product,
    sparse_min_sum, CrossFun, Kernel, MatrixError, Normalize, SparseMatrix,
};

// Re-export the engine
pub use crosswin_engine::{
    cross_similarity, CrossOptions, DateUnit, EngineError, Result, RowFilter, WindowIndex,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        cross_similarity, CrossFun, CrossOptions, DateUnit, EngineError, Normalize, Result,
        SparseMatrix,
    };
}
