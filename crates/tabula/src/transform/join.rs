//! Inner join with join-key inference.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::table::Table;

/// Suffix appended to right-hand columns whose name clashes with the left,
/// repeated until the name is free.
const RIGHT_SUFFIX: &str = "_right";

impl Table {
    /// Inner join with `other` on the single column both tables share.
    ///
    /// A candidate key is a column name present in both tables whose
    /// non-empty values overlap. Exactly one candidate is required; none or
    /// several is a [`TabulaError::JoinAmbiguity`].
    pub fn merge_by_columns(&self, other: &Table) -> Result<Table> {
        let candidates = self.join_candidates(other);
        match candidates.as_slice() {
            [key] => {
                debug!(key = %key, "inferred join key");
                self.join_on(other, key)
            }
            [] => Err(TabulaError::JoinAmbiguity(
                "no shared column with overlapping values".to_string(),
            )),
            many => Err(TabulaError::JoinAmbiguity(format!(
                "several candidate join columns: {}",
                many.join(", ")
            ))),
        }
    }

    /// Inner join with `other` on an explicit key column.
    pub fn merge_on(&self, other: &Table, key: &str) -> Result<Table> {
        self.schema().require(key)?;
        other.schema().require(key)?;
        self.join_on(other, key)
    }

    fn join_candidates(&self, other: &Table) -> Vec<&str> {
        self.schema()
            .names()
            .filter(|name| other.schema().contains(name))
            .filter(|name| {
                let (Ok(left), Ok(right)) = (self.column(name), other.column(name)) else {
                    return false;
                };
                let domain: HashSet<&str> = left
                    .iter()
                    .map(|s| s.as_str())
                    .filter(|s| !s.trim().is_empty())
                    .collect();
                right.iter().any(|v| domain.contains(v.as_str()))
            })
            .collect()
    }

    fn join_on(&self, other: &Table, key: &str) -> Result<Table> {
        let left_key = self.schema().require(key)?;
        let right_key = other.schema().require(key)?;

        let mut schema = self.schema().clone();
        let right_columns: Vec<usize> = (0..other.column_count()).filter(|&c| c != right_key).collect();
        for &c in &right_columns {
            let name = other.schema().name(c).unwrap_or_default();
            let mut unique = name.to_string();
            while schema.contains(&unique) {
                unique.push_str(RIGHT_SUFFIX);
            }
            schema.push(unique)?;
        }

        let mut lookup: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row, value) in other.column_at(right_key).iter().enumerate() {
            if !value.trim().is_empty() {
                lookup.entry(value.as_str()).or_default().push(row);
            }
        }

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); schema.len()];
        let mut row_count = 0;
        for left_row in 0..self.row_count() {
            let value = self.column_at(left_key)[left_row].as_str();
            let Some(matches) = lookup.get(value) else {
                continue;
            };
            for &right_row in matches {
                for c in 0..self.column_count() {
                    columns[c].push(self.column_at(c)[left_row].clone());
                }
                for (offset, &c) in right_columns.iter().enumerate() {
                    columns[self.column_count() + offset].push(other.column_at(c)[right_row].clone());
                }
                row_count += 1;
            }
        }

        debug!(key, rows = row_count, "joined tables");
        Ok(Table::from_parts(schema, columns, row_count))
    }
}
