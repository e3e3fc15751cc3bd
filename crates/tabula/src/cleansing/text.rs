//! Per-column text rewrites and outlier removal.

use tracing::debug;

use super::{MaskingStrategy, NormalizationStrategy};
use crate::error::Result;
use crate::stats;
use crate::table::Table;

impl Table {
    /// Apply a normalization strategy to every cell of `column`.
    pub fn normalize(&self, column: &str, strategy: NormalizationStrategy) -> Result<Table> {
        let index = self.schema().require(column)?;
        Ok(self.map_column(index, |cell| strategy.apply(cell)))
    }

    /// Apply one normalization strategy per named column.
    ///
    /// All names are checked before anything is rewritten.
    pub fn normalize_columns(&self, strategies: &[(&str, NormalizationStrategy)]) -> Result<Table> {
        self.rewrite_columns(strategies, |strategy, cell| strategy.apply(cell))
    }

    /// Clip cells of `column` longer than `max_len` characters.
    pub fn truncate(&self, column: &str, max_len: usize) -> Result<Table> {
        let index = self.schema().require(column)?;
        Ok(self.map_column(index, |cell| clip(cell, max_len)))
    }

    /// Clip each named column to its own character limit.
    pub fn truncate_columns(&self, limits: &[(&str, usize)]) -> Result<Table> {
        self.rewrite_columns(limits, |&max_len, cell| clip(cell, max_len))
    }

    /// Apply one masking strategy per named column.
    pub fn mask_columns_with_strategies(
        &self,
        strategies: &[(&str, MaskingStrategy)],
    ) -> Result<Table> {
        self.rewrite_columns(strategies, |strategy, cell| strategy.apply(cell))
    }

    /// Rows whose value in `column` lies within the Tukey fences of that
    /// column. Every cell must be numeric.
    pub fn remove_outliers(&self, column: &str) -> Result<Table> {
        let values = self.numeric_column(column)?;
        if values.is_empty() {
            return Ok(self.clone());
        }

        let (low, high) = stats::iqr_range(&values)?;
        let kept: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, v)| (low..=high).contains(v))
            .map(|(row, _)| row)
            .collect();

        debug!(
            column,
            low,
            high,
            removed = self.row_count() - kept.len(),
            "removed outliers"
        );
        Ok(self.select_rows(&kept))
    }

    fn rewrite_columns<P, F>(&self, columns: &[(&str, P)], f: F) -> Result<Table>
    where
        F: Fn(&P, &str) -> String,
    {
        let indices = columns
            .iter()
            .map(|(name, _)| self.schema().require(name))
            .collect::<Result<Vec<usize>>>()?;

        let mut table = self.clone();
        for (index, (_, param)) in indices.into_iter().zip(columns) {
            for cell in table.cells_mut(index) {
                *cell = f(param, cell);
            }
        }
        Ok(table)
    }
}

fn clip(cell: &str, max_len: usize) -> String {
    match cell.char_indices().nth(max_len) {
        Some((byte, _)) => cell[..byte].to_string(),
        None => cell.to_string(),
    }
}
