//! Options for a cross-similarity invocation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crosswin_core::{CrossFun, MatrixError, Normalize, SparseMatrix};

use crate::error::{EngineError, Result};

/// Time unit for the comparison window offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    #[default]
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DateUnit {
    /// Length of one unit in seconds.
    #[inline]
    #[must_use]
    pub fn seconds(self) -> f64 {
        match self {
            DateUnit::Days => 86_400.0,
            DateUnit::Hours => 3_600.0,
            DateUnit::Minutes => 60.0,
            DateUnit::Seconds => 1.0,
        }
    }
}

impl FromStr for DateUnit {
    type Err = MatrixError;

    fn from_str(s: &str) -> std::result::Result<Self, MatrixError> {
        match s {
            "days" => Ok(DateUnit::Days),
            "hours" => Ok(DateUnit::Hours),
            "minutes" => Ok(DateUnit::Minutes),
            "seconds" => Ok(DateUnit::Seconds),
            other => Err(MatrixError::UnknownToken {
                kind: "date_unit",
                token: other.to_string(),
            }),
        }
    }
}

/// Options controlling one `cross_similarity` invocation.
///
/// Unset bounds are unbounded; unset metadata disables the matching
/// constraint. With `m2` absent the secondary side defaults to the primary
/// side's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossOptions {
    /// Drop scores below this (inclusive bound kept).
    pub min_value: Option<f64>,
    /// Drop scores above this (inclusive bound kept).
    pub max_value: Option<f64>,
    /// Keep only entries with column >= row. Symmetric comparisons only.
    pub only_upper: bool,
    /// Keep the diagonal. Setting this to false requires a symmetric
    /// comparison.
    pub diag: bool,
    /// Keep at most this many entries per row, highest scores first,
    /// ties broken by lower column index.
    pub top_n: Option<usize>,
    /// Row rescaling applied before scoring.
    pub normalize: Normalize,
    /// Pairwise combination rule.
    pub crossfun: CrossFun,
    /// Divide raw scores by the unnormalized row sum of `m`.
    pub rowsum_div: bool,
    /// Standardize each row's computed scores before thresholding.
    /// Symmetric comparisons only.
    pub zscore: bool,
    /// Per-row group labels for `m`; pairs must share a label.
    pub group: Option<Vec<String>>,
    /// Per-row group labels for `m2`.
    pub group2: Option<Vec<String>>,
    /// Per-row timestamps for `m`, in epoch seconds.
    pub date: Option<Vec<i64>>,
    /// Per-row timestamps for `m2`, in epoch seconds.
    pub date2: Option<Vec<i64>>,
    /// Left window offset in `date_unit` units, inclusive.
    pub lwindow: f64,
    /// Right window offset in `date_unit` units, inclusive.
    pub rwindow: f64,
    pub date_unit: DateUnit,
    /// Feature-adjacency matrix required by `softprod` / `softl2`.
    /// Supplied programmatically, never through the serialized form.
    #[serde(skip)]
    pub simmat: Option<SparseMatrix>,
    /// Adjacency entries below this are treated as zero.
    pub simmat_thres: f64,
    /// Primary rows per batch.
    pub batchsize: usize,
}

impl Default for CrossOptions {
    fn default() -> Self {
        Self {
            min_value: None,
            max_value: None,
            only_upper: false,
            diag: true,
            top_n: None,
            normalize: Normalize::None,
            crossfun: CrossFun::Prod,
            rowsum_div: false,
            zscore: false,
            group: None,
            group2: None,
            date: None,
            date2: None,
            lwindow: -1.0,
            rwindow: 1.0,
            date_unit: DateUnit::Days,
            simmat: None,
            simmat_thres: 0.0,
            batchsize: 1000,
        }
    }
}

impl CrossOptions {
    /// Check every option against the input matrices. Runs before any
    /// scoring; a failure here is atomic.
    pub fn validate(&self, m: &SparseMatrix, m2: Option<&SparseMatrix>) -> Result<()> {
        let secondary = m2.unwrap_or(m);

        if let Some(sec) = m2 {
            if m.cols() != sec.cols() {
                return Err(EngineError::ColumnMismatch(m.cols(), sec.cols()));
            }
        }

        if let Some(group) = &self.group {
            if group.len() != m.rows() {
                return Err(EngineError::LengthMismatch {
                    what: "group",
                    got: group.len(),
                    expected: m.rows(),
                });
            }
        }
        if let Some(group2) = &self.group2 {
            if group2.len() != secondary.rows() {
                return Err(EngineError::LengthMismatch {
                    what: "group2",
                    got: group2.len(),
                    expected: secondary.rows(),
                });
            }
        }
        if let Some(date) = &self.date {
            if date.len() != m.rows() {
                return Err(EngineError::LengthMismatch {
                    what: "date",
                    got: date.len(),
                    expected: m.rows(),
                });
            }
        }
        if let Some(date2) = &self.date2 {
            if date2.len() != secondary.rows() {
                return Err(EngineError::LengthMismatch {
                    what: "date2",
                    got: date2.len(),
                    expected: secondary.rows(),
                });
            }
        }

        // a constraint on one side of a two-matrix comparison needs its
        // counterpart; for self-comparison the secondary side defaults
        if m2.is_some() && self.group.is_some() && self.group2.is_none() {
            return Err(EngineError::MissingCounterpart {
                given: "group",
                missing: "group2",
            });
        }
        if self.group2.is_some() && self.group.is_none() {
            return Err(EngineError::MissingCounterpart {
                given: "group2",
                missing: "group",
            });
        }
        if m2.is_some() && self.date.is_some() && self.date2.is_none() {
            return Err(EngineError::MissingCounterpart {
                given: "date",
                missing: "date2",
            });
        }
        if self.date2.is_some() && self.date.is_none() {
            return Err(EngineError::MissingCounterpart {
                given: "date2",
                missing: "date",
            });
        }

        let symmetric = m.rows() == secondary.rows();
        if self.only_upper && !symmetric {
            return Err(EngineError::SymmetricOnly("only_upper"));
        }
        if !self.diag && !symmetric {
            return Err(EngineError::SymmetricOnly("diag"));
        }
        if self.zscore && !symmetric {
            return Err(EngineError::SymmetricOnly("zscore"));
        }

        let needs_adjacency =
            self.crossfun == CrossFun::SoftProd || self.normalize == Normalize::SoftL2;
        match &self.simmat {
            None if needs_adjacency => {
                let which = if self.crossfun == CrossFun::SoftProd {
                    "softprod"
                } else {
                    "softl2"
                };
                return Err(EngineError::Matrix(MatrixError::MissingAdjacency(which)));
            }
            Some(simmat) => {
                if simmat.rows() != m.cols() || simmat.cols() != m.cols() {
                    return Err(EngineError::AdjacencyDimension {
                        expected: m.cols(),
                        rows: simmat.rows(),
                        cols: simmat.cols(),
                    });
                }
            }
            None => {}
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if max < min {
                return Err(EngineError::InvalidRange { min, max });
            }
        }
        if self.top_n == Some(0) {
            return Err(EngineError::NonPositive("top_n"));
        }
        if self.batchsize == 0 {
            return Err(EngineError::NonPositive("batchsize"));
        }

        Ok(())
    }
}
