//! Pairwise scoring kernels over sparse rows.
//!
//! Every kernel works directly on the two rows' sorted (index, value) slices
//! via merge-join; no row is ever densified. Accumulation order is fixed
//! (ascending feature index) so scores are reproducible regardless of how the
//! surrounding batches are scheduled.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::sparse::SparseMatrix;

/// The pairwise combination rule applied per row pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossFun {
    /// Dot product; cosine similarity when rows are L2-normalized.
    #[default]
    Prod,
    /// Sum of element-wise minima over shared nonzero features.
    Min,
    /// Soft inner product v1' S v2 through a feature-adjacency matrix.
    SoftProd,
    /// Largest single per-feature product instead of a sum.
    MaxProduct,
}

impl CrossFun {
    /// Resolve this rule into a [`Kernel`], binding the adjacency matrix
    /// when the rule needs one.
    ///
    /// # Errors
    ///
    /// `SoftProd` without an adjacency matrix is a configuration error.
    pub fn bind(self, adjacency: Option<&SparseMatrix>) -> Result<Kernel<'_>> {
        match self {
            CrossFun::Prod => Ok(Kernel::Dot),
            CrossFun::Min => Ok(Kernel::MinSum),
            CrossFun::MaxProduct => Ok(Kernel::MaxProduct),
            CrossFun::SoftProd => match adjacency {
                Some(adj) => Ok(Kernel::Soft(adj)),
                None => Err(MatrixError::MissingAdjacency("softprod")),
            },
        }
    }
}

impl FromStr for CrossFun {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prod" => Ok(CrossFun::Prod),
            "min" => Ok(CrossFun::Min),
            "softprod" => Ok(CrossFun::SoftProd),
            "maxproduct" => Ok(CrossFun::MaxProduct),
            other => Err(MatrixError::UnknownToken {
                kind: "crossfun",
                token: other.to_string(),
            }),
        }
    }
}

/// A [`CrossFun`] resolved against its inputs, ready to score row pairs.
#[derive(Debug, Clone, Copy)]
pub enum Kernel<'a> {
    Dot,
    MinSum,
    MaxProduct,
    Soft(&'a SparseMatrix),
}

impl Kernel<'_> {
    /// Raw score for one eligible row pair.
    #[inline]
    #[must_use]
    pub fn score(&self, ai: &[u32], av: &[f64], bi: &[u32], bv: &[f64]) -> f64 {
        match self {
            Kernel::Dot => sparse_dot(ai, av, bi, bv),
            Kernel::MinSum => sparse_min_sum(ai, av, bi, bv),
            Kernel::MaxProduct => sparse_max_product(ai, av, bi, bv),
            Kernel::Soft(adj) => soft_product(ai, av, bi, bv, adj),
        }
    }
}

/// Merge-join dot product of two sorted sparse vectors, O(|a| + |b|).
#[inline]
#[must_use]
pub fn sparse_dot(ai: &[u32], av: &[f64], bi: &[u32], bv: &[f64]) -> f64 {
    debug_assert_eq!(ai.len(), av.len());
    debug_assert_eq!(bi.len(), bv.len());

    let mut sum = 0.0;
    let (mut p, mut q) = (0, 0);
    while p < ai.len() && q < bi.len() {
        match ai[p].cmp(&bi[q]) {
            std::cmp::Ordering::Equal => {
                sum += av[p] * bv[q];
                p += 1;
                q += 1;
            }
            std::cmp::Ordering::Less => p += 1,
            std::cmp::Ordering::Greater => q += 1,
        }
    }
    sum
}

/// Sum of min(a_k, b_k) over features nonzero in both vectors.
///
/// Divided by the unnormalized sum of row a, this is the share of row a's
/// mass also present in row b.
#[inline]
#[must_use]
pub fn sparse_min_sum(ai: &[u32], av: &[f64], bi: &[u32], bv: &[f64]) -> f64 {
    let mut sum = 0.0;
    let (mut p, mut q) = (0, 0);
    while p < ai.len() && q < bi.len() {
        match ai[p].cmp(&bi[q]) {
            std::cmp::Ordering::Equal => {
                sum += av[p].min(bv[q]);
                p += 1;
                q += 1;
            }
            std::cmp::Ordering::Less => p += 1,
            std::cmp::Ordering::Greater => q += 1,
        }
    }
    sum
}

/// Largest per-feature product max_k(a_k * b_k); 0.0 when no feature is
/// shared. One strong shared feature dominates instead of being diluted.
#[inline]
#[must_use]
pub fn sparse_max_product(ai: &[u32], av: &[f64], bi: &[u32], bv: &[f64]) -> f64 {
    let mut max: Option<f64> = None;
    let (mut p, mut q) = (0, 0);
    while p < ai.len() && q < bi.len() {
        match ai[p].cmp(&bi[q]) {
            std::cmp::Ordering::Equal => {
                let prod = av[p] * bv[q];
                max = Some(match max {
                    Some(m) if m >= prod => m,
                    _ => prod,
                });
                p += 1;
                q += 1;
            }
            std::cmp::Ordering::Less => p += 1,
            std::cmp::Ordering::Greater => q += 1,
        }
    }
    max.unwrap_or(0.0)
}

/// Soft inner product a' S b against a pruned adjacency matrix.
///
/// Iterates a's nonzero features ascending and merge-joins each adjacency
/// column with b, crediting similarity between related but non-identical
/// features.
#[must_use]
pub fn soft_product(
    ai: &[u32],
    av: &[f64],
    bi: &[u32],
    bv: &[f64],
    adjacency: &SparseMatrix,
) -> f64 {
    let mut sum = 0.0;
    for (p, &k) in ai.iter().enumerate() {
        // symmetric adjacency: column k doubles as row k
        let (si, sv) = adjacency.col(k as usize);
        let contribution = sparse_dot(si, sv, bi, bv);
        sum += av[p] * contribution;
    }
    sum
}
