//! Reshaping and per-column rewrites.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::table::Table;

/// Delimiter used by [`Table::explode`].
pub const DEFAULT_EXPLODE_DELIMITER: &str = ";";

impl Table {
    /// One row per `;`-separated token of `column`.
    pub fn explode(&self, column: &str) -> Result<Table> {
        self.explode_with(column, DEFAULT_EXPLODE_DELIMITER)
    }

    /// One row per `delimiter`-separated token of `column`, other cells
    /// duplicated.
    ///
    /// Tokens are trimmed and empty tokens dropped. A cell without the
    /// delimiter, or with no tokens left, keeps its row unchanged.
    pub fn explode_with(&self, column: &str, delimiter: &str) -> Result<Table> {
        if delimiter.is_empty() {
            return Err(TabulaError::Argument(
                "explode delimiter must not be empty".to_string(),
            ));
        }
        let target = self.schema().require(column)?;

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); self.column_count()];
        let mut row_count = 0;
        for row in 0..self.row_count() {
            let cell = &self.column_at(target)[row];
            let tokens: Vec<&str> = if cell.contains(delimiter) {
                cell.split(delimiter)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            } else {
                Vec::new()
            };

            if tokens.is_empty() {
                for (c, out) in columns.iter_mut().enumerate() {
                    out.push(self.column_at(c)[row].clone());
                }
                row_count += 1;
                continue;
            }

            for token in tokens {
                for (c, out) in columns.iter_mut().enumerate() {
                    if c == target {
                        out.push(token.to_string());
                    } else {
                        out.push(self.column_at(c)[row].clone());
                    }
                }
                row_count += 1;
            }
        }

        debug!(column, before = self.row_count(), after = row_count, "exploded column");
        Ok(Table::from_parts(self.schema().clone(), columns, row_count))
    }

    /// Rows with duplicates removed; the first occurrence is kept.
    pub fn distinct(&self) -> Table {
        let mut seen: HashSet<Vec<&str>> = HashSet::new();
        let rows: Vec<usize> = self
            .rows()
            .filter(|row| seen.insert(row.values().collect()))
            .map(|row| row.index())
            .collect();
        self.select_rows(&rows)
    }

    /// Count of each distinct value of `column`, in first-seen order.
    pub fn value_histogram(&self, column: &str) -> Result<IndexMap<String, usize>> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for value in self.column(column)? {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// New table with every cell of `column` rewritten by `f`.
    pub fn transform<F>(&self, column: &str, f: F) -> Result<Table>
    where
        F: FnMut(&str) -> String,
    {
        let index = self.schema().require(column)?;
        Ok(self.map_column(index, f))
    }
}
