//! # crosswin Core
//!
//! Core library for the crosswin similarity engine.
//!
//! This crate provides the numeric leaves of the engine:
//!
//! - [`SparseMatrix`] - Compressed sparse column storage for row x feature matrices
//! - [`CrossFun`] / [`Kernel`] - Pairwise scoring semantics over sparse rows
//! - [`Normalize`] - Row rescaling (l2, soft-l2) applied before scoring
//!
//! ## Example
//!
//! ```rust
//! use crosswin_core::{SparseMatrix, CrossFun, Normalize, normalize_rows};
//!
//! // [[1, 1, 0],
//! //  [0, 1, 1]]
//! let m = SparseMatrix::from_triplets(2, 3, &[
//!     (0, 0, 1.0), (0, 1, 1.0),
//!     (1, 1, 1.0), (1, 2, 1.0),
//! ]).unwrap();
//!
//! let normalized = normalize_rows(&m, Normalize::L2, None).unwrap();
//! let rows = normalized.transpose();
//! let (ai, av) = rows.col(0);
//! let (bi, bv) = rows.col(1);
//!
//! let kernel = CrossFun::Prod.bind(None).unwrap();
//! let cosine = kernel.score(ai, av, bi, bv);
//! assert!((cosine - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod kernel;
pub mod normalize;
pub mod sparse;

pub use error::{MatrixError, Result};
pub use kernel::{
    soft_product, sparse_dot, sparse_max_product, sparse_min_sum, CrossFun, Kernel,
};
pub use normalize::{normalize_rows, Normalize};
pub use sparse::{prune_adjacency, SparseMatrix};
