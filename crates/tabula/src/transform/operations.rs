//! Operator parameters.

use serde::{Deserialize, Serialize};

/// How numeric columns are reduced per group by
/// [`Table::aggregate`](crate::table::Table::aggregate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Sum of values.
    #[default]
    Sum,
    /// Arithmetic mean of values.
    Average,
    /// Number of rows in the group.
    Count,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

impl AggregationMethod {
    /// Reduce one group's values.
    ///
    /// `rows` is the group's row count, used by [`AggregationMethod::Count`].
    /// Returns `None` when there is nothing to average or compare.
    pub fn reduce(&self, values: &[f64], rows: usize) -> Option<f64> {
        match self {
            AggregationMethod::Sum => Some(values.iter().sum()),
            AggregationMethod::Count => Some(rows as f64),
            AggregationMethod::Average => {
                if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                }
            }
            AggregationMethod::Min => values.iter().copied().reduce(f64::min),
            AggregationMethod::Max => values.iter().copied().reduce(f64::max),
        }
    }

    /// Get a human-readable description of the method.
    pub fn description(&self) -> &'static str {
        match self {
            AggregationMethod::Sum => "sum",
            AggregationMethod::Average => "average",
            AggregationMethod::Count => "count",
            AggregationMethod::Min => "minimum",
            AggregationMethod::Max => "maximum",
        }
    }
}

/// Sort order for [`Table::sort_by`](crate::table::Table::sort_by).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(AggregationMethod::Sum.reduce(&values, 3), Some(6.0));
        assert_eq!(AggregationMethod::Average.reduce(&values, 3), Some(2.0));
        assert_eq!(AggregationMethod::Count.reduce(&values, 4), Some(4.0));
        assert_eq!(AggregationMethod::Min.reduce(&values, 3), Some(1.0));
        assert_eq!(AggregationMethod::Max.reduce(&values, 3), Some(3.0));
        assert_eq!(AggregationMethod::Max.reduce(&[], 0), None);
        assert_eq!(AggregationMethod::Sum.reduce(&[], 0), Some(0.0));
    }
}
