//! Positional slicing, sampling and column splits.

use std::iter::FusedIterator;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::table::Table;

/// Overlapping windows of consecutive rows, from
/// [`Table::sliding_window`].
///
/// Clone the iterator to walk the windows again.
#[derive(Debug, Clone)]
pub struct SlidingWindows<'a> {
    table: &'a Table,
    size: usize,
    next: usize,
}

impl SlidingWindows<'_> {
    fn total(&self) -> usize {
        (self.table.row_count() + 1).saturating_sub(self.size)
    }
}

impl Iterator for SlidingWindows<'_> {
    type Item = Table;

    fn next(&mut self) -> Option<Table> {
        if self.next >= self.total() {
            return None;
        }
        let rows: Vec<usize> = (self.next..self.next + self.size).collect();
        self.next += 1;
        Some(self.table.select_rows(&rows))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlidingWindows<'_> {}

impl FusedIterator for SlidingWindows<'_> {}

impl Table {
    /// The first `n` rows (fewer if the table is shorter).
    pub fn top(&self, n: usize) -> Table {
        let n = n.min(self.row_count());
        self.select_rows(&(0..n).collect::<Vec<_>>())
    }

    /// The last `n` rows (fewer if the table is shorter).
    pub fn bottom(&self, n: usize) -> Table {
        let n = n.min(self.row_count());
        self.select_rows(&(self.row_count() - n..self.row_count()).collect::<Vec<_>>())
    }

    /// `take` rows after skipping `skip`, clamped to the table.
    pub fn middle(&self, skip: usize, take: usize) -> Table {
        let start = skip.min(self.row_count());
        let end = start.saturating_add(take).min(self.row_count());
        self.select_rows(&(start..end).collect::<Vec<_>>())
    }

    /// Windows of `size` consecutive rows, advancing one row at a time.
    pub fn sliding_window(&self, size: usize) -> Result<SlidingWindows<'_>> {
        if size == 0 {
            return Err(TabulaError::Argument(
                "window size must be positive".to_string(),
            ));
        }
        Ok(SlidingWindows {
            table: self,
            size,
            next: 0,
        })
    }

    /// Up to `per_group` rows for each distinct value of `column`.
    ///
    /// Groups come in first-seen order; rows within a group keep their
    /// original order.
    pub fn stratified_sample(&self, column: &str, per_group: usize) -> Result<Table> {
        let index = self.schema().require(column)?;
        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (row, value) in self.column_at(index).iter().enumerate() {
            let rows = groups.entry(value.as_str()).or_default();
            if rows.len() < per_group {
                rows.push(row);
            }
        }
        let rows: Vec<usize> = groups.into_values().flatten().collect();
        debug!(column, per_group, rows = rows.len(), "stratified sample");
        Ok(self.select_rows(&rows))
    }

    /// `n` distinct rows picked with a seeded generator, in original order.
    ///
    /// The same seed always picks the same rows.
    pub fn random_sample(&self, n: usize, seed: u64) -> Table {
        let total = self.row_count();
        let n = n.min(total);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut rows: Vec<usize> = (0..total).collect();
        // partial Fisher-Yates
        for i in 0..n {
            let j = rng.usize(i..total);
            rows.swap(i, j);
        }
        rows.truncate(n);
        rows.sort_unstable();
        self.select_rows(&rows)
    }

    /// Project the same rows into one table per column set.
    pub fn split_by_columns(&self, column_sets: &[&[&str]]) -> Result<Vec<Table>> {
        column_sets.iter().map(|names| self.pick(names)).collect()
    }
}
