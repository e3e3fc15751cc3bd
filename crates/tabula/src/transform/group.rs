//! Grouping: split and aggregate.

use indexmap::IndexMap;
use tracing::debug;

use super::operations::AggregationMethod;
use crate::error::Result;
use crate::schema::{Schema, format_number, parse_number};
use crate::table::Table;

impl Table {
    /// Partition rows by the exact value of `column`.
    ///
    /// Groups appear in first-seen order; an empty cell is a key like any
    /// other.
    pub fn split_on(&self, column: &str) -> Result<IndexMap<String, Table>> {
        let index = self.schema().require(column)?;
        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (row, value) in self.column_at(index).iter().enumerate() {
            groups.entry(value.as_str()).or_default().push(row);
        }

        debug!(column, groups = groups.len(), "split table");
        Ok(groups
            .into_iter()
            .map(|(key, rows)| (key.to_string(), self.select_rows(&rows)))
            .collect())
    }

    /// One row per distinct combination of `group_columns`, with every
    /// numeric non-key column reduced by `method`.
    ///
    /// Non-numeric non-key columns are dropped. A column counts as numeric
    /// when it has a non-empty cell and all non-empty cells parse; empty
    /// cells are skipped in the reduction.
    pub fn aggregate(&self, group_columns: &[&str], method: AggregationMethod) -> Result<Table> {
        let key_indices = group_columns
            .iter()
            .map(|name| self.schema().require(name))
            .collect::<Result<Vec<_>>>()?;

        let value_indices: Vec<usize> = (0..self.column_count())
            .filter(|i| !key_indices.contains(i) && self.is_numeric_column(*i))
            .collect();

        let mut groups: IndexMap<Vec<&str>, Vec<usize>> = IndexMap::new();
        for row in 0..self.row_count() {
            let key: Vec<&str> = key_indices
                .iter()
                .map(|&c| self.column_at(c)[row].as_str())
                .collect();
            groups.entry(key).or_default().push(row);
        }

        let mut names: Vec<&str> = group_columns.to_vec();
        names.extend(value_indices.iter().filter_map(|&i| self.schema().name(i)));
        let schema = Schema::from_names(names.iter().copied())?;

        let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(groups.len()); names.len()];
        for (key, rows) in &groups {
            for (slot, value) in key.iter().enumerate() {
                columns[slot].push(value.to_string());
            }
            for (offset, &col) in value_indices.iter().enumerate() {
                let cells = self.column_at(col);
                let values: Vec<f64> = rows.iter().filter_map(|&r| parse_number(&cells[r])).collect();
                let reduced = method
                    .reduce(&values, rows.len())
                    .map(format_number)
                    .unwrap_or_default();
                columns[key.len() + offset].push(reduced);
            }
        }

        debug!(
            method = method.description(),
            groups = groups.len(),
            value_columns = value_indices.len(),
            "aggregated table"
        );
        Ok(Table::from_parts(schema, columns, groups.len()))
    }

    fn is_numeric_column(&self, index: usize) -> bool {
        let mut seen = false;
        for cell in self.column_at(index) {
            if cell.trim().is_empty() {
                continue;
            }
            if parse_number(cell).is_none() {
                return false;
            }
            seen = true;
        }
        seen
    }
}
