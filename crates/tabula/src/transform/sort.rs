//! Stable sorting.

use std::cmp::Ordering;

use super::operations::SortDirection;
use crate::error::Result;
use crate::schema::parse_number;
use crate::table::Table;

impl Table {
    /// Stable sort by one column.
    ///
    /// Numeric cells compare numerically and sort before text cells, which
    /// compare lexicographically. Ties keep their original relative order in
    /// both directions.
    pub fn sort_by(&self, column: &str, direction: SortDirection) -> Result<Table> {
        let values = self.column(column)?;
        let mut indices: Vec<usize> = (0..self.row_count()).collect();
        indices.sort_by(|&a, &b| {
            let ord = compare_cells(&values[a], &values[b]);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        Ok(self.select_rows(&indices))
    }
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(keys: &[&str]) -> Table {
        let tags: Vec<String> = (0..keys.len()).map(|i| i.to_string()).collect();
        Table::from_columns([
            ("key", keys.iter().map(|s| s.to_string()).collect()),
            ("tag", tags),
        ])
        .unwrap()
    }

    fn tags(t: &Table) -> Vec<&str> {
        t.column("tag").unwrap().iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_numeric_before_lexicographic() {
        let t = table(&["10", "9", "apple", "2.5", "Banana"]);
        let sorted = t.sort_by("key", SortDirection::Ascending).unwrap();
        assert_eq!(
            sorted.column("key").unwrap(),
            &["2.5", "9", "10", "Banana", "apple"].map(String::from)[..]
        );
    }

    #[test]
    fn test_descending_reverses_unique_keys() {
        let t = table(&["c", "a", "d", "b"]);
        let asc = t.sort_by("key", SortDirection::Ascending).unwrap();
        let desc = t.sort_by("key", SortDirection::Descending).unwrap();
        let mut reversed = tags(&asc);
        reversed.reverse();
        assert_eq!(tags(&desc), reversed);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let t = table(&["b", "a", "b", "a"]);
        let asc = t.sort_by("key", SortDirection::Ascending).unwrap();
        assert_eq!(tags(&asc), vec!["1", "3", "0", "2"]);
        let desc = t.sort_by("key", SortDirection::Descending).unwrap();
        assert_eq!(tags(&desc), vec!["0", "2", "1", "3"]);
    }

    #[test]
    fn test_unknown_column() {
        assert!(table(&["a"]).sort_by("nope", SortDirection::Ascending).is_err());
    }
}
