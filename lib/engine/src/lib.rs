//! # crosswin Engine
//!
//! Windowed sparse-matrix cross-similarity engine.
//!
//! Given one or two sparse row x feature matrices, the engine computes
//! pairwise scores between rows, restricted to pairs permitted by optional
//! group and time-window constraints, filtered by value thresholds, and
//! combined under a pluggable scoring rule (dot product, min-sum, soft
//! product, max-product).
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌────────────────┐
//! │ Normalize │──>│ WindowIndex │──>│ BatchScheduler │
//! │ (rows)    │   │ (eligible?) │   │ (rayon, 1000)  │
//! └───────────┘   └─────────────┘   └───────┬────────┘
//!                                           │ per pair
//!                 ┌─────────────┐   ┌───────▼────────┐
//!                 │  Assemble   │<──│ Kernel + Row   │
//!                 │ (canonical) │   │ PostFilter     │
//!                 └─────────────┘   └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use crosswin_core::{SparseMatrix, CrossFun, Normalize};
//! use crosswin_engine::{cross_similarity, CrossOptions};
//!
//! let m = SparseMatrix::from_triplets(2, 3, &[
//!     (0, 0, 1.0), (0, 1, 1.0),
//!     (1, 1, 1.0), (1, 2, 1.0),
//! ]).unwrap();
//!
//! let options = CrossOptions {
//!     normalize: Normalize::L2,
//!     crossfun: CrossFun::Prod,
//!     only_upper: true,
//!     diag: false,
//!     ..Default::default()
//! };
//!
//! let scores = cross_similarity(&m, None, &options).unwrap();
//! assert!((scores.get(0, 1) - 0.5).abs() < 1e-12);
//! ```
//!
//! ## Determinism
//!
//! Batches run in parallel on the rayon pool, but the result is identical
//! for any thread count: kernels accumulate ascending by feature index,
//! rows score their candidates ascending by secondary row index, and batch
//! outputs are concatenated in batch order.

pub mod assemble;
pub mod batch;
pub mod engine;
pub mod error;
pub mod options;
pub mod postfilter;
pub mod window;

// Re-export main types for convenience
pub use engine::cross_similarity;
pub use error::{EngineError, Result};
pub use options::{CrossOptions, DateUnit};
pub use postfilter::RowFilter;
pub use window::WindowIndex;
