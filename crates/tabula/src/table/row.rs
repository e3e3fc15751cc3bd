//! Borrowed row view.

use super::Table;

/// A view of one row, borrowed from its [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(table: &'a Table, index: usize) -> Self {
        Self { table, index }
    }

    /// Position of this row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of a column by name.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let col = self.table.schema().index_of(column)?;
        self.table.cell_at(self.index, col)
    }

    /// Value of a column by position.
    pub fn get_at(&self, column: usize) -> Option<&'a str> {
        self.table.cell_at(self.index, column)
    }

    /// Values in column order.
    pub fn values(self) -> impl Iterator<Item = &'a str> {
        (0..self.table.column_count()).filter_map(move |c| self.table.cell_at(self.index, c))
    }

    /// Owned copy of the row's values.
    pub fn to_vec(&self) -> Vec<String> {
        self.values().map(String::from).collect()
    }
}
