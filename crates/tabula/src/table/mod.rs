//! Columnar cell store.
//!
//! A [`Table`] is an ordered set of named columns, each holding exactly
//! `row_count` text cells. Every transform takes `&self` and returns a new
//! table; only [`Table::add_column`] and [`Table::add_formula_column`] mutate,
//! and only while the table is still being built.

mod columns;
mod row;

pub use row::Row;

use crate::error::{Result, TabulaError};
use crate::schema::{Schema, parse_number};

/// In-memory table of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    schema: Schema,
    /// Column-major storage, parallel to `schema`.
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl Table {
    /// Create an empty table with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major data.
    pub fn from_rows<H, S>(headers: H, rows: Vec<Vec<String>>) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = Schema::from_names(headers)?;
        let row_count = rows.len();
        let mut columns: Vec<Vec<String>> = (0..schema.len())
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != schema.len() {
                return Err(TabulaError::Shape {
                    column: format!("row {}", row_idx),
                    expected: schema.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Ok(Self {
            schema,
            columns,
            row_count,
        })
    }

    /// Build a table from `(name, values)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.add_column(name, values)?;
        }
        Ok(table)
    }

    /// Assemble a table from parts that are already known to be consistent.
    pub(crate) fn from_parts(schema: Schema, columns: Vec<Vec<String>>, row_count: usize) -> Self {
        debug_assert_eq!(schema.len(), columns.len(), "schema/column count mismatch");
        debug_assert!(
            columns.iter().all(|c| c.len() == row_count),
            "ragged columns"
        );
        Self {
            schema,
            columns,
            row_count,
        }
    }

    /// The table's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names().collect()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Row view at `index`.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.row_count).then(|| Row::new(self, index))
    }

    /// Iterate row views in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.row_count).map(move |i| Row::new(self, i))
    }

    /// Cell at a row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.schema.index_of(column)?;
        self.cell_at(row, col)
    }

    /// Cell at a row index and column position.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|c| c.get(row))
            .map(|s| s.as_str())
    }

    /// All values of a column.
    pub fn column(&self, name: &str) -> Result<&[String]> {
        let index = self.schema.require(name)?;
        Ok(&self.columns[index])
    }

    /// All values of a column read as numbers.
    ///
    /// Every cell must parse; the first one that does not is reported.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, value)| {
                parse_number(value).ok_or_else(|| TabulaError::ValueConversion {
                    column: name.to_string(),
                    row,
                    value: value.clone(),
                })
            })
            .collect()
    }

    pub(crate) fn column_at(&self, index: usize) -> &[String] {
        &self.columns[index]
    }

    /// Mutable cells of one column. The slice keeps the column length fixed.
    pub(crate) fn cells_mut(&mut self, index: usize) -> &mut [String] {
        &mut self.columns[index]
    }

    /// New table holding the given rows, in the given order.
    pub(crate) fn select_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| indices.iter().map(|&i| column[i].clone()).collect())
            .collect();
        Self::from_parts(self.schema.clone(), columns, indices.len())
    }

    /// New table with one column rewritten cell by cell.
    pub(crate) fn map_column<F>(&self, index: usize, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut table = self.clone();
        for cell in &mut table.columns[index] {
            *cell = f(cell);
        }
        table
    }
}
