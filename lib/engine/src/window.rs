//! Row-pair eligibility from group labels and timestamps.
//!
//! A [`WindowIndex`] is built once per invocation. It answers two questions:
//! the exact per-pair test [`WindowIndex::eligible`], and a coarse per-batch
//! candidate pre-filter [`WindowIndex::candidates`] that restricts the
//! secondary rows worth scoring at all. The pre-filter uses a hash map from
//! group label to row indices and a timestamp-sorted row order with binary
//! range queries, never a full O(n*m) scan.

use ahash::{AHashMap, AHashSet};

use crate::options::CrossOptions;

/// Eligibility predicate over (primary row, secondary row) pairs.
#[derive(Debug)]
pub struct WindowIndex<'a> {
    groups: Option<GroupIndex<'a>>,
    dates: Option<DateIndex<'a>>,
    secondary_rows: usize,
}

#[derive(Debug)]
struct GroupIndex<'a> {
    primary: &'a [String],
    secondary: &'a [String],
    /// label -> sorted secondary row indices
    by_label: AHashMap<&'a str, Vec<u32>>,
}

#[derive(Debug)]
struct DateIndex<'a> {
    primary: &'a [i64],
    secondary: &'a [i64],
    /// secondary rows sorted by timestamp (ties by row index)
    order: Vec<u32>,
    /// inclusive window bounds in seconds
    left: f64,
    right: f64,
}

impl<'a> WindowIndex<'a> {
    /// Build the index from whichever constraints the options carry.
    ///
    /// Metadata lengths and counterpart rules are checked by
    /// [`CrossOptions::validate`] before this runs; with `m2` absent the
    /// secondary side falls back to the primary side's metadata.
    #[must_use]
    pub fn build(options: &'a CrossOptions, secondary_rows: usize) -> Self {
        let groups = options.group.as_ref().map(|primary| {
            let secondary = options.group2.as_ref().unwrap_or(primary);
            let mut by_label: AHashMap<&str, Vec<u32>> = AHashMap::new();
            for (j, label) in secondary.iter().enumerate() {
                by_label.entry(label.as_str()).or_default().push(j as u32);
            }
            GroupIndex {
                primary,
                secondary,
                by_label,
            }
        });

        let dates = options.date.as_ref().map(|primary| {
            let secondary = options.date2.as_ref().unwrap_or(primary);
            let mut order: Vec<u32> = (0..secondary.len() as u32).collect();
            order.sort_unstable_by_key(|&j| (secondary[j as usize], j));
            let unit = options.date_unit.seconds();
            DateIndex {
                primary,
                secondary,
                order,
                left: options.lwindow * unit,
                right: options.rwindow * unit,
            }
        });

        Self {
            groups,
            dates,
            secondary_rows,
        }
    }

    /// True when no group or date constraint was supplied.
    #[inline]
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.groups.is_none() && self.dates.is_none()
    }

    /// Exact pair test: same group (if grouped) AND timestamp difference
    /// inside the inclusive window (if dated).
    #[inline]
    #[must_use]
    pub fn eligible(&self, i: u32, j: u32) -> bool {
        if let Some(g) = &self.groups {
            if g.primary[i as usize] != g.secondary[j as usize] {
                return false;
            }
        }
        if let Some(d) = &self.dates {
            let delta = (d.secondary[j as usize] - d.primary[i as usize]) as f64;
            if delta < d.left || delta > d.right {
                return false;
            }
        }
        true
    }

    /// Signed timestamp difference `date2[j] - date[i]` in seconds, when
    /// dates were supplied. Downstream graph drivers use this for edge
    /// time-difference attributes.
    #[inline]
    #[must_use]
    pub fn delta_seconds(&self, i: u32, j: u32) -> Option<i64> {
        self.dates
            .as_ref()
            .map(|d| d.secondary[j as usize] - d.primary[i as usize])
    }

    /// Coarse candidate set for a batch of consecutive primary rows:
    /// secondary rows that can satisfy [`eligible`](Self::eligible) for at
    /// least one row in the batch. `None` means every secondary row is a
    /// candidate. The returned list is sorted ascending.
    #[must_use]
    pub fn candidates(&self, batch: std::ops::Range<usize>) -> Option<Vec<u32>> {
        if batch.is_empty() {
            return Some(Vec::new());
        }

        let by_group = self.groups.as_ref().map(|g| {
            let labels: AHashSet<&str> = batch
                .clone()
                .map(|i| g.primary[i].as_str())
                .collect();
            let mut rows: Vec<u32> = labels
                .iter()
                .filter_map(|label| g.by_label.get(label))
                .flatten()
                .copied()
                .collect();
            rows.sort_unstable();
            rows
        });

        let by_date = self.dates.as_ref().map(|d| {
            let min_t = batch.clone().map(|i| d.primary[i]).min().unwrap_or(0);
            let max_t = batch.clone().map(|i| d.primary[i]).max().unwrap_or(0);
            let lo = min_t as f64 + d.left;
            let hi = max_t as f64 + d.right;
            let start = d
                .order
                .partition_point(|&j| (d.secondary[j as usize] as f64) < lo);
            let end = d
                .order
                .partition_point(|&j| (d.secondary[j as usize] as f64) <= hi);
            let mut rows: Vec<u32> = d.order[start..end].to_vec();
            rows.sort_unstable();
            rows
        });

        match (by_group, by_date) {
            (None, None) => None,
            (Some(rows), None) | (None, Some(rows)) => Some(rows),
            (Some(a), Some(b)) => Some(intersect_sorted(&a, &b)),
        }
    }

    /// Row count of the secondary matrix; the candidate universe when no
    /// constraint applies.
    #[inline]
    #[must_use]
    pub fn secondary_rows(&self) -> usize {
        self.secondary_rows
    }
}

fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut p, mut q) = (0, 0);
    while p < a.len() && q < b.len() {
        match a[p].cmp(&b[q]) {
            std::cmp::Ordering::Equal => {
                out.push(a[p]);
                p += 1;
                q += 1;
            }
            std::cmp::Ordering::Less => p += 1,
            std::cmp::Ordering::Greater => q += 1,
        }
    }
    out
}
