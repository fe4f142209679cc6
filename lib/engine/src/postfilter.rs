//! Per-row filtering of computed scores.
//!
//! Applied to one primary row's computed candidate scores at a time, in a
//! fixed order: z-score transform, value thresholds, upper-triangle
//! restriction, diagonal exclusion, top-n truncation. The z-score and top-n
//! steps need the whole row materialized first, which is why scoring is
//! two-pass per row rather than streaming.

use ordered_float::OrderedFloat;

use crate::options::CrossOptions;

/// Row-wise filter settings lifted out of [`CrossOptions`].
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub only_upper: bool,
    pub keep_diag: bool,
    pub top_n: Option<usize>,
    pub zscore: bool,
}

impl RowFilter {
    #[must_use]
    pub fn from_options(options: &CrossOptions) -> Self {
        Self {
            min_value: options.min_value,
            max_value: options.max_value,
            only_upper: options.only_upper,
            keep_diag: options.diag,
            top_n: options.top_n,
            zscore: options.zscore,
        }
    }

    /// Filter one row's (column, score) candidates in place.
    ///
    /// `scores` holds every computed entry of primary row `row`, ascending
    /// by column; entries surviving all steps remain, in no particular
    /// order (final ordering is the assembler's job).
    pub fn apply(&self, row: u32, scores: &mut Vec<(u32, f64)>) {
        if scores.is_empty() {
            return;
        }

        if self.zscore {
            standardize(scores);
        }

        scores.retain(|&(col, value)| {
            if self.min_value.is_some_and(|min| value < min) {
                return false;
            }
            if self.max_value.is_some_and(|max| value > max) {
                return false;
            }
            if self.only_upper && col < row {
                return false;
            }
            if !self.keep_diag && col == row {
                return false;
            }
            true
        });

        if let Some(n) = self.top_n {
            if scores.len() > n {
                // highest score first, ties broken by lower column
                scores.sort_unstable_by_key(|&(col, value)| {
                    (std::cmp::Reverse(OrderedFloat(value)), col)
                });
                scores.truncate(n);
            }
        }
    }
}

/// Replace each score with (score - mean) / stddev, computed over the row's
/// computed entries. Sample standard deviation; rows with fewer than two
/// entries or zero deviation map to 0.
fn standardize(scores: &mut [(u32, f64)]) {
    let n = scores.len() as f64;
    let mean = scores.iter().map(|&(_, v)| v).sum::<f64>() / n;
    if scores.len() < 2 {
        for entry in scores.iter_mut() {
            entry.1 = 0.0;
        }
        return;
    }
    let var = scores.iter().map(|&(_, v)| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sd = var.sqrt();
    for entry in scores.iter_mut() {
        entry.1 = if sd > 0.0 { (entry.1 - mean) / sd } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RowFilter {
        RowFilter {
            min_value: None,
            max_value: None,
            only_upper: false,
            keep_diag: true,
            top_n: None,
            zscore: false,
        }
    }

    #[test]
    fn test_threshold_bounds_inclusive() {
        let f = RowFilter {
            min_value: Some(0.5),
            max_value: Some(1.0),
            ..filter()
        };
        let mut scores = vec![(0, 0.4), (1, 0.5), (2, 1.0), (3, 1.1)];
        f.apply(9, &mut scores);
        assert_eq!(scores, vec![(1, 0.5), (2, 1.0)]);
    }

    #[test]
    fn test_only_upper_drops_lower_triangle() {
        let f = RowFilter {
            only_upper: true,
            ..filter()
        };
        let mut scores = vec![(0, 1.0), (2, 1.0), (3, 1.0)];
        f.apply(2, &mut scores);
        assert_eq!(scores, vec![(2, 1.0), (3, 1.0)]);
    }

    #[test]
    fn test_diag_excluded() {
        let f = RowFilter {
            keep_diag: false,
            ..filter()
        };
        let mut scores = vec![(1, 1.0), (2, 1.0)];
        f.apply(2, &mut scores);
        assert_eq!(scores, vec![(1, 1.0)]);
    }

    #[test]
    fn test_top_n_ties_prefer_lower_column() {
        let f = RowFilter {
            top_n: Some(2),
            ..filter()
        };
        let mut scores = vec![(0, 0.3), (1, 0.9), (2, 0.9), (3, 0.9)];
        f.apply(0, &mut scores);
        scores.sort_unstable_by_key(|&(col, _)| col);
        assert_eq!(scores, vec![(1, 0.9), (2, 0.9)]);
    }

    #[test]
    fn test_zscore_before_threshold() {
        // raw scores 1, 2, 3 -> z-scores -1, 0, 1; threshold applies after
        let f = RowFilter {
            zscore: true,
            min_value: Some(0.0),
            ..filter()
        };
        let mut scores = vec![(0, 1.0), (1, 2.0), (2, 3.0)];
        f.apply(9, &mut scores);
        assert_eq!(scores.len(), 2);
        assert!((scores[0].1 - 0.0).abs() < 1e-12);
        assert!((scores[1].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zscore_degenerate_rows() {
        let f = RowFilter {
            zscore: true,
            ..filter()
        };
        let mut single = vec![(0, 5.0)];
        f.apply(1, &mut single);
        assert_eq!(single, vec![(0, 0.0)]);

        let mut constant = vec![(0, 2.0), (1, 2.0)];
        f.apply(9, &mut constant);
        assert!(constant.iter().all(|&(_, v)| v == 0.0));
    }
}
