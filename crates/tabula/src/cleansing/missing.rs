//! Marking and filling missing values.

use tracing::debug;

use super::MissingValueStrategy;
use crate::error::{Result, TabulaError};
use crate::table::Table;

impl Table {
    /// Replace every cell of `column` not in `whitelist` with `sentinel`.
    ///
    /// Cells already equal to `sentinel` stay as they are.
    pub fn mark_as_missing_if_not_any_of(
        &self,
        column: &str,
        sentinel: &str,
        whitelist: &[&str],
    ) -> Result<Table> {
        let index = self.schema().require(column)?;
        let mut marked = 0usize;
        let table = self.map_column(index, |cell| {
            if cell == sentinel || whitelist.contains(&cell) {
                cell.to_string()
            } else {
                marked += 1;
                sentinel.to_string()
            }
        });
        debug!(column, marked, "marked cells as missing");
        Ok(table)
    }

    /// Fill cells equal to any of `missing_tokens` from the column's other
    /// values, column by column.
    ///
    /// Columns without a missing token are left alone. A column made up
    /// entirely of missing tokens has nothing to derive a fill value from and
    /// is an error.
    pub fn replace_missing_values_by_default(
        &self,
        strategy: MissingValueStrategy,
        missing_tokens: &[&str],
    ) -> Result<Table> {
        let mut table = self.clone();

        for (index, name) in self.schema().names().enumerate() {
            let cells = self.column_at(index);
            let is_missing = |cell: &str| missing_tokens.contains(&cell);

            let missing_count = cells.iter().filter(|c| is_missing(c.as_str())).count();
            if missing_count == 0 {
                continue;
            }

            let (rows, present): (Vec<usize>, Vec<&str>) = cells
                .iter()
                .enumerate()
                .filter(|(_, c)| !is_missing(c.as_str()))
                .map(|(row, c)| (row, c.as_str()))
                .unzip();
            if present.is_empty() {
                return Err(TabulaError::Argument(format!(
                    "column '{}' has no present values to fill from",
                    name
                )));
            }

            let fill = strategy.fill_value(&present).map_err(|err| match err {
                TabulaError::ValueConversion { row, value, .. } => TabulaError::ValueConversion {
                    column: name.to_string(),
                    row: rows[row],
                    value,
                },
                other => other,
            })?;

            for cell in table.cells_mut(index) {
                if is_missing(cell.as_str()) {
                    *cell = fill.clone();
                }
            }
            debug!(column = name, filled = missing_count, fill = %fill, "replaced missing values");
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        Table::from_rows(
            headers,
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_mark_as_missing() {
        let t = make_table(
            vec!["major"],
            vec![vec!["CS"], vec!["Art"], vec!["Math"], vec!["N/A"]],
        );
        let marked = t
            .mark_as_missing_if_not_any_of("major", "N/A", &["CS", "Math"])
            .unwrap();
        assert_eq!(
            marked.column("major").unwrap(),
            &["CS", "N/A", "Math", "N/A"].map(String::from)[..]
        );
        assert_eq!(t.cell(1, "major"), Some("Art"));
        assert!(t.mark_as_missing_if_not_any_of("nope", "N/A", &[]).is_err());
    }

    #[test]
    fn test_replace_missing_mean() {
        let t = make_table(
            vec!["name", "score"],
            vec![vec!["a", "10"], vec!["b", "?"], vec!["c", "20"]],
        );
        let filled = t
            .replace_missing_values_by_default(MissingValueStrategy::Mean, &["?"])
            .unwrap();
        assert_eq!(filled.cell(1, "score"), Some("15"));
        // untouched: no missing tokens in a text column
        assert_eq!(filled.column("name").unwrap(), t.column("name").unwrap());
    }

    #[test]
    fn test_replace_missing_mode_on_text() {
        let t = make_table(
            vec!["city"],
            vec![vec!["Oslo"], vec![""], vec!["Rome"], vec!["Oslo"]],
        );
        let filled = t
            .replace_missing_values_by_default(MissingValueStrategy::Mode, &[""])
            .unwrap();
        assert_eq!(filled.cell(1, "city"), Some("Oslo"));
    }

    #[test]
    fn test_replace_missing_errors() {
        let all_missing = make_table(vec!["x"], vec![vec!["NA"], vec!["NA"]]);
        assert!(matches!(
            all_missing.replace_missing_values_by_default(MissingValueStrategy::Max, &["NA"]),
            Err(TabulaError::Argument(_))
        ));

        let text = make_table(vec!["x"], vec![vec!["NA"], vec!["1"], vec!["abc"]]);
        match text.replace_missing_values_by_default(MissingValueStrategy::Max, &["NA"]) {
            Err(TabulaError::ValueConversion { column, row, value }) => {
                assert_eq!(column, "x");
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
