//! The windowed cross-similarity pipeline.
//!
//! One invocation is: validate, prune adjacency, normalize rows, build the
//! window index, score batches, post-filter per row, assemble. The engine
//! holds no state across calls; all inputs are read-only for the duration
//! of a call and any validation failure aborts before scoring.

use tracing::{debug, info};

use crosswin_core::{normalize_rows, prune_adjacency, SparseMatrix};

use crate::assemble::assemble;
use crate::batch::run_batches;
use crate::error::Result;
use crate::options::CrossOptions;
use crate::postfilter::RowFilter;
use crate::window::WindowIndex;

/// Compute pairwise scores between the rows of `m` and the rows of `m2`
/// (or `m` itself when `m2` is `None`), restricted to window-eligible
/// pairs and filtered by the options.
///
/// The output is sparse with `m.rows()` rows and `m2.rows()` columns;
/// entry (i, j) is the filtered score of primary row i against secondary
/// row j. Zero surviving entries is a valid outcome, distinct from an
/// error.
///
/// Scores are reproducible for any rayon thread count: kernels accumulate
/// ascending by feature, each row scores its candidates ascending by
/// secondary row, and batch outputs are concatenated in batch order.
///
/// # Errors
///
/// All caller-input problems (length mismatches, missing counterpart
/// metadata, symmetric-only options on asymmetric inputs, missing or
/// misshapen adjacency, inverted bounds) surface before any scoring.
pub fn cross_similarity(
    m: &SparseMatrix,
    m2: Option<&SparseMatrix>,
    options: &CrossOptions,
) -> Result<SparseMatrix> {
    options.validate(m, m2)?;

    let secondary_rows = m2.map_or(m.rows(), SparseMatrix::rows);

    let adjacency = match &options.simmat {
        Some(simmat) => Some(prune_adjacency(simmat, options.simmat_thres)?),
        None => None,
    };
    let adjacency = adjacency.as_ref();

    // rowsum_div divides by the unnormalized row mass, so capture it first
    let row_sums = options.rowsum_div.then(|| m.row_sums());

    let by_row = normalize_rows(m, options.normalize, adjacency)?.transpose();
    let by_row2 = match m2 {
        Some(secondary) => normalize_rows(secondary, options.normalize, adjacency)?.transpose(),
        None => by_row.clone(),
    };

    let kernel = options.crossfun.bind(adjacency)?;
    let window = WindowIndex::build(options, secondary_rows);
    let filter = RowFilter::from_options(options);

    info!(
        rows = m.rows(),
        secondary_rows,
        batchsize = options.batchsize,
        constrained = !window.is_unconstrained(),
        "scoring row pairs"
    );

    let triples = run_batches(m.rows(), options.batchsize, |range| {
        let candidates = window.candidates(range.clone());
        let mut out: Vec<(u32, u32, f64)> = Vec::new();
        for i in range.clone() {
            let (ai, av) = by_row.col(i);
            if ai.is_empty() {
                continue;
            }
            let divisor = match &row_sums {
                Some(sums) if sums[i] == 0.0 => continue,
                Some(sums) => sums[i],
                None => 1.0,
            };

            let mut row_scores: Vec<(u32, f64)> = Vec::new();
            let mut score_pair = |j: u32| {
                if !window.eligible(i as u32, j) {
                    return;
                }
                let (bi, bv) = by_row2.col(j as usize);
                let score = kernel.score(ai, av, bi, bv);
                if score != 0.0 {
                    row_scores.push((j, score / divisor));
                }
            };
            match &candidates {
                Some(rows) => rows.iter().copied().for_each(&mut score_pair),
                None => (0..window.secondary_rows() as u32).for_each(&mut score_pair),
            }

            filter.apply(i as u32, &mut row_scores);
            out.extend(row_scores.into_iter().map(|(j, v)| (i as u32, j, v)));
        }
        debug!(
            batch_start = range.start,
            batch_end = range.end,
            produced = out.len(),
            "batch scored"
        );
        out
    });

    assemble(m.rows(), secondary_rows, triples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DateUnit;
    use crosswin_core::{CrossFun, Normalize};

    fn two_docs() -> SparseMatrix {
        // [[1, 1, 0],
        //  [0, 1, 1]]
        SparseMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (0, 1, 1.0), (1, 1, 1.0), (1, 2, 1.0)])
            .unwrap()
    }

    #[test]
    fn test_cosine_upper_triangle_scenario() {
        let opts = CrossOptions {
            normalize: Normalize::L2,
            crossfun: CrossFun::Prod,
            min_value: Some(0.0),
            only_upper: true,
            diag: false,
            ..Default::default()
        };
        let out = cross_similarity(&two_docs(), None, &opts).unwrap();
        assert_eq!(out.nnz(), 1);
        assert!((out.get(0, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_with_rowsum_div_scenario() {
        let opts = CrossOptions {
            crossfun: CrossFun::Min,
            rowsum_div: true,
            diag: false,
            ..Default::default()
        };
        let out = cross_similarity(&two_docs(), None, &opts).unwrap();
        // overlap of row 0 with row 1 is 1.0, divided by row 0 sum 2.0
        assert!((out.get(0, 1) - 0.5).abs() < 1e-12);
        assert!((out.get(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_window_excludes_out_of_range_pairs() {
        let opts = CrossOptions {
            date: Some(vec![0, 86_400, 90_000]),
            lwindow: 0.0,
            rwindow: 24.0,
            date_unit: DateUnit::Hours,
            diag: false,
            ..Default::default()
        };
        let m = SparseMatrix::from_triplets(
            3,
            1,
            &[(0, 0, 1.0), (1, 0, 1.0), (2, 0, 1.0)],
        )
        .unwrap();
        let out = cross_similarity(&m, None, &opts).unwrap();
        // from row 0: t+24h included (inclusive bound), t+25h excluded
        assert!(out.get(0, 1) > 0.0);
        assert_eq!(out.get(0, 2), 0.0);
        // window is directional: looking back from row 1 to row 0 fails lwindow=0
        assert_eq!(out.get(1, 0), 0.0);
    }

    #[test]
    fn test_group_restricts_pairs() {
        let opts = CrossOptions {
            group: Some(vec!["a".into(), "b".into(), "a".into()]),
            diag: false,
            ..Default::default()
        };
        let m = SparseMatrix::from_triplets(
            3,
            1,
            &[(0, 0, 1.0), (1, 0, 1.0), (2, 0, 1.0)],
        )
        .unwrap();
        let out = cross_similarity(&m, None, &opts).unwrap();
        assert!(out.get(0, 2) > 0.0);
        assert_eq!(out.get(0, 1), 0.0);
        assert_eq!(out.get(1, 2), 0.0);
    }

    #[test]
    fn test_batchsize_does_not_change_result() {
        let m = SparseMatrix::from_triplets(
            5,
            4,
            &[
                (0, 0, 1.0),
                (0, 1, 2.0),
                (1, 1, 1.0),
                (2, 2, 3.0),
                (2, 3, 1.0),
                (3, 0, 2.0),
                (3, 3, 1.0),
                (4, 1, 1.0),
                (4, 2, 1.0),
            ],
        )
        .unwrap();
        let mut opts = CrossOptions {
            normalize: Normalize::L2,
            ..Default::default()
        };
        opts.batchsize = 1;
        let small = cross_similarity(&m, None, &opts).unwrap();
        opts.batchsize = 1000;
        let large = cross_similarity(&m, None, &opts).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn test_two_matrix_comparison() {
        let m = SparseMatrix::from_triplets(1, 2, &[(0, 0, 1.0)]).unwrap();
        let m2 =
            SparseMatrix::from_triplets(3, 2, &[(0, 0, 2.0), (1, 1, 1.0), (2, 0, 1.0)]).unwrap();
        let out = cross_similarity(&m, Some(&m2), &CrossOptions::default()).unwrap();
        assert_eq!(out.rows(), 1);
        assert_eq!(out.cols(), 3);
        assert_eq!(out.get(0, 0), 2.0);
        assert_eq!(out.get(0, 1), 0.0);
        assert_eq!(out.get(0, 2), 1.0);
    }

    #[test]
    fn test_empty_result_is_ok_not_error() {
        let opts = CrossOptions {
            min_value: Some(100.0),
            ..Default::default()
        };
        let out = cross_similarity(&two_docs(), None, &opts).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_maxproduct_takes_strongest_feature() {
        // rows share features 0 (1*2=2) and 1 (3*1=3)
        let m = SparseMatrix::from_triplets(
            2,
            2,
            &[(0, 0, 1.0), (0, 1, 3.0), (1, 0, 2.0), (1, 1, 1.0)],
        )
        .unwrap();
        let opts = CrossOptions {
            crossfun: CrossFun::MaxProduct,
            diag: false,
            ..Default::default()
        };
        let out = cross_similarity(&m, None, &opts).unwrap();
        assert!((out.get(0, 1) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_soft_cosine_with_adjacency() {
        // two documents on distinct but perfectly related features
        let m = SparseMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, 1.0)]).unwrap();
        let simmat = SparseMatrix::from_triplets(
            2,
            2,
            &[(0, 0, 1.0), (1, 1, 1.0), (0, 1, 1.0), (1, 0, 1.0)],
        )
        .unwrap();
        let opts = CrossOptions {
            crossfun: CrossFun::SoftProd,
            normalize: Normalize::SoftL2,
            simmat: Some(simmat),
            ..Default::default()
        };
        let out = cross_similarity(&m, None, &opts).unwrap();
        assert!((out.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((out.get(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_simmat_threshold_prunes_weak_links() {
        let m = SparseMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, 1.0)]).unwrap();
        let simmat = SparseMatrix::from_triplets(
            2,
            2,
            &[(0, 0, 1.0), (1, 1, 1.0), (0, 1, 0.2), (1, 0, 0.2)],
        )
        .unwrap();
        let opts = CrossOptions {
            crossfun: CrossFun::SoftProd,
            simmat: Some(simmat),
            simmat_thres: 0.5,
            diag: false,
            ..Default::default()
        };
        let out = cross_similarity(&m, None, &opts).unwrap();
        assert!(out.is_empty());
    }
}
