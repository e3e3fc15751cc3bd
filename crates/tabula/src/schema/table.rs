//! Table-level schema definition.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabulaError};

/// Ordered set of unique, case-sensitive column names.
///
/// Position lookups go through the underlying hash index, so resolving a
/// name to its column index is O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    names: IndexSet<String>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from names, failing on the first duplicate.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::new();
        for name in names {
            schema.push(name)?;
        }
        Ok(schema)
    }

    /// Append a column name and return its position.
    pub fn push(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(TabulaError::duplicate_column(&name));
        }
        let (index, _) = self.names.insert_full(name);
        Ok(index)
    }

    /// Position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    /// Position of a column by name, or a schema error.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| TabulaError::unknown_column(name))
    }

    /// Whether a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Column name at a position.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(|s| s.as_str())
    }

    /// Iterate column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Rename a column in place, keeping its position.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let index = self.require(from)?;
        if from == to {
            return Ok(());
        }
        if self.contains(to) {
            return Err(TabulaError::duplicate_column(to));
        }
        self.names = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| if i == index { to.to_string() } else { name.clone() })
            .collect();
        Ok(())
    }
}
