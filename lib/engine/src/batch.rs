//! Batch partitioning and parallel fan-out.
//!
//! Primary rows are split into consecutive fixed-size batches. Batches are
//! independent and read-only over the normalized inputs and the window
//! index, so they run on the rayon pool; per-batch outputs are collected in
//! batch index order, which keeps the final result identical for any thread
//! count.

use std::ops::Range;

use rayon::prelude::*;

/// Consecutive row ranges of at most `batchsize` rows; the last one may be
/// smaller.
#[must_use]
pub fn batch_ranges(rows: usize, batchsize: usize) -> Vec<Range<usize>> {
    (0..rows)
        .step_by(batchsize.max(1))
        .map(|start| start..(start + batchsize).min(rows))
        .collect()
}

/// Run `score_batch` over every batch in parallel and concatenate the
/// per-batch triple lists in batch order.
pub fn run_batches<F>(rows: usize, batchsize: usize, score_batch: F) -> Vec<(u32, u32, f64)>
where
    F: Fn(Range<usize>) -> Vec<(u32, u32, f64)> + Sync + Send,
{
    let per_batch: Vec<Vec<(u32, u32, f64)>> = batch_ranges(rows, batchsize)
        .into_par_iter()
        .map(score_batch)
        .collect();
    per_batch.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_ranges_cover_all_rows() {
        let ranges = batch_ranges(10, 4);
        assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_batch_ranges_single_batch() {
        assert_eq!(batch_ranges(3, 100), vec![0..3]);
    }

    #[test]
    fn test_batch_ranges_empty_matrix() {
        assert!(batch_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_run_batches_preserves_batch_order() {
        // each batch emits its own start row; order must survive parallelism
        let triples = run_batches(100, 7, |range| {
            vec![(range.start as u32, 0, range.start as f64)]
        });
        let starts: Vec<u32> = triples.iter().map(|t| t.0).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(triples.len(), batch_ranges(100, 7).len());
    }
}
