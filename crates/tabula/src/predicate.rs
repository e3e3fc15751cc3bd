//! Row predicates and filtering.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::schema::Schema;
use crate::table::{Row, Table};

/// A rule over a pair of cells. Rows where the rule holds are rejected by
/// [`Predicate::Combination`].
#[derive(Clone)]
pub enum CombinationRule {
    /// Arbitrary pairwise rule.
    Custom(Arc<dyn Fn(&str, &str) -> bool + Send + Sync>),
    /// Holds if any inner rule holds.
    Any(Vec<CombinationRule>),
    /// Holds if every inner rule holds.
    All(Vec<CombinationRule>),
}

impl CombinationRule {
    /// Wrap a closure as a rule.
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        CombinationRule::Custom(Arc::new(rule))
    }

    /// Whether the pair `(first, second)` violates this rule.
    pub fn violates(&self, first: &str, second: &str) -> bool {
        match self {
            CombinationRule::Custom(rule) => rule(first, second),
            CombinationRule::Any(rules) => rules.iter().any(|r| r.violates(first, second)),
            CombinationRule::All(rules) => rules.iter().all(|r| r.violates(first, second)),
        }
    }
}

impl fmt::Debug for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationRule::Custom(_) => f.write_str("Custom(..)"),
            CombinationRule::Any(rules) => f.debug_tuple("Any").field(rules).finish(),
            CombinationRule::All(rules) => f.debug_tuple("All").field(rules).finish(),
        }
    }
}

/// A condition a row must satisfy to be kept.
#[derive(Clone)]
pub enum Predicate {
    /// Cell equals `value` exactly.
    Equals { column: String, value: String },
    /// Cell contains `needle`.
    Contains { column: String, needle: String },
    /// Cell matches `regex`.
    Matches { column: String, regex: Regex },
    /// Every listed column's cell is in its allowed set.
    Whitelist(IndexMap<String, HashSet<String>>),
    /// Some cell in the row contains the text.
    Search(String),
    /// Reject rows where `rule(first, second)` holds.
    Combination {
        first: String,
        second: String,
        rule: CombinationRule,
    },
    /// Arbitrary row predicate.
    Custom(Arc<dyn Fn(&Row<'_>) -> bool + Send + Sync>),
}

impl Predicate {
    /// Exact equality on a column.
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Substring match on a column.
    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    /// Regex match on a column.
    pub fn matches(column: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Predicate::Matches {
            column: column.into(),
            regex: Regex::new(pattern)?,
        })
    }

    /// Single-column whitelist.
    pub fn any_of<I, S>(column: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = IndexMap::new();
        map.insert(column.into(), allowed.into_iter().map(Into::into).collect());
        Predicate::Whitelist(map)
    }

    /// Wrap a closure over the row view.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(f))
    }

    /// Check that every referenced column exists.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::Contains { column, .. }
            | Predicate::Matches { column, .. } => schema.require(column).map(|_| ()),
            Predicate::Whitelist(map) => {
                for column in map.keys() {
                    schema.require(column)?;
                }
                Ok(())
            }
            Predicate::Combination { first, second, .. } => {
                schema.require(first)?;
                schema.require(second)?;
                Ok(())
            }
            Predicate::Search(_) | Predicate::Custom(_) => Ok(()),
        }
    }

    /// Whether a row satisfies this predicate.
    pub fn test(&self, row: &Row<'_>) -> bool {
        match self {
            Predicate::Equals { column, value } => row.get(column) == Some(value.as_str()),
            Predicate::Contains { column, needle } => row
                .get(column)
                .is_some_and(|cell| cell.contains(needle.as_str())),
            Predicate::Matches { column, regex } => {
                row.get(column).is_some_and(|cell| regex.is_match(cell))
            }
            Predicate::Whitelist(map) => map.iter().all(|(column, allowed)| {
                row.get(column).is_some_and(|cell| allowed.contains(cell))
            }),
            Predicate::Search(text) => row.values().any(|cell| cell.contains(text.as_str())),
            Predicate::Combination {
                first,
                second,
                rule,
            } => match (row.get(first), row.get(second)) {
                (Some(a), Some(b)) => !rule.violates(a, b),
                _ => true,
            },
            Predicate::Custom(f) => f(row),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { column, value } => f
                .debug_struct("Equals")
                .field("column", column)
                .field("value", value)
                .finish(),
            Predicate::Contains { column, needle } => f
                .debug_struct("Contains")
                .field("column", column)
                .field("needle", needle)
                .finish(),
            Predicate::Matches { column, regex } => f
                .debug_struct("Matches")
                .field("column", column)
                .field("regex", &regex.as_str())
                .finish(),
            Predicate::Whitelist(map) => f.debug_tuple("Whitelist").field(map).finish(),
            Predicate::Search(text) => f.debug_tuple("Search").field(text).finish(),
            Predicate::Combination {
                first,
                second,
                rule,
            } => f
                .debug_struct("Combination")
                .field("first", first)
                .field("second", second)
                .field("rule", rule)
                .finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Table {
    /// Rows satisfying every predicate, in original order.
    pub fn filter(&self, predicates: &[Predicate]) -> Result<Self> {
        for predicate in predicates {
            predicate.validate(self.schema())?;
        }
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| predicates.iter().all(|p| p.test(row)))
            .map(|row| row.index())
            .collect();

        debug!(
            predicates = predicates.len(),
            kept = indices.len(),
            total = self.row_count(),
            "filtered rows"
        );
        Ok(self.select_rows(&indices))
    }

    /// Rows whose `column` equals `value`.
    pub fn filter_equals(&self, column: &str, value: &str) -> Result<Self> {
        self.filter(&[Predicate::equals(column, value)])
    }

    /// Drop rows where `rule(first, second)` holds.
    pub fn remove_combination(
        &self,
        first: &str,
        second: &str,
        rule: CombinationRule,
    ) -> Result<Self> {
        self.filter(&[Predicate::Combination {
            first: first.to_string(),
            second: second.to_string(),
            rule,
        }])
    }

    /// Drop rows whose `column` value is not in `whitelist`.
    pub fn remove_if_not_any_of(&self, column: &str, whitelist: &[&str]) -> Result<Self> {
        self.filter(&[Predicate::any_of(column, whitelist.iter().copied())])
    }

    /// Drop rows whose numeric `column` value lies in `[low, high]`.
    pub fn remove_if_between(&self, column: &str, low: f64, high: f64) -> Result<Self> {
        let values = self.numeric_column(column)?;
        let indices: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v < low || v > high)
            .map(|(i, _)| i)
            .collect();
        Ok(self.select_rows(&indices))
    }
}
