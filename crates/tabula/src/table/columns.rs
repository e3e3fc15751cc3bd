//! Column management: add, derive, drop, pick, rename.

use tracing::debug;

use super::Table;
use crate::error::{Result, TabulaError};
use crate::expression::Formula;
use crate::schema::Schema;

impl Table {
    /// Append a column while the table is being built.
    ///
    /// The first column added to a table with no columns sets the row count;
    /// every later column must match it.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        let name = name.into();
        if self.schema.contains(&name) {
            return Err(TabulaError::duplicate_column(&name));
        }
        if !self.schema.is_empty() && values.len() != self.row_count {
            return Err(TabulaError::Shape {
                column: name,
                expected: self.row_count,
                actual: values.len(),
            });
        }

        if self.schema.is_empty() {
            self.row_count = values.len();
        }
        self.schema.push(name)?;
        self.columns.push(values);
        Ok(())
    }

    /// Builder-style [`Table::add_column`].
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<String>) -> Result<Self> {
        self.add_column(name, values)?;
        Ok(self)
    }

    /// Append a column computed once from a formula such as `"[Price]*[Qty]"`.
    ///
    /// `decimal_digits` fixes the number of fractional digits in the rendered
    /// value; `None` keeps full precision. Unknown column references fail
    /// before any row is evaluated.
    pub fn add_formula_column(
        &mut self,
        name: impl Into<String>,
        formula: &str,
        decimal_digits: Option<usize>,
    ) -> Result<()> {
        let name = name.into();
        if self.schema.contains(&name) {
            return Err(TabulaError::duplicate_column(&name));
        }

        let formula = Formula::parse(formula)?;
        for column in formula.columns() {
            self.schema.require(column)?;
        }

        let values = self
            .rows()
            .map(|row| {
                formula
                    .evaluate(&row)
                    .map(|value| Formula::render(value, decimal_digits))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(column = %name, formula = formula.source(), "added formula column");
        self.add_column(name, values)
    }

    /// New table without the named columns.
    pub fn drop(&self, names: &[&str]) -> Result<Self> {
        for name in names {
            self.schema.require(name)?;
        }
        let keep: Vec<&str> = self
            .schema
            .names()
            .filter(|name| !names.contains(name))
            .collect();
        self.project(&keep)
    }

    /// New table with only the named columns, in the requested order.
    pub fn pick(&self, names: &[&str]) -> Result<Self> {
        self.project(names)
    }

    /// New table with a column renamed in place.
    pub fn rename_column(&self, from: &str, to: &str) -> Result<Self> {
        let mut table = self.clone();
        table.schema.rename(from, to)?;
        Ok(table)
    }

    fn project(&self, names: &[&str]) -> Result<Self> {
        let schema = Schema::from_names(names.iter().copied())?;
        let columns = names
            .iter()
            .map(|name| {
                self.schema
                    .require(name)
                    .map(|index| self.columns[index].clone())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(schema, columns, self.row_count))
    }
}
