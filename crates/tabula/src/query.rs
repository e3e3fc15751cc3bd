//! Fixed-template English queries translated into predicates.
//!
//! Recognised phrasings (case-insensitive, trailing `.` or `?` ignored):
//!
//! - `show me all rows where <alias> is <value>`
//! - `show me all rows where <alias> contains <value>`
//! - `show me all <value> <alias> who <verb> <object>`
//! - `show me all <entity> who <verb> <object>`
//! - `show me all <value> <alias>`
//!
//! Aliases and verbs resolve to columns through the translator's alias table,
//! falling back to a case-insensitive column name match.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::predicate::Predicate;
use crate::schema::Schema;
use crate::table::Table;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static ROWS_WHERE_IS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^show me all rows where (\S+) is (.+)$").unwrap());

static ROWS_WHERE_CONTAINS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^show me all rows where (\S+) contains (.+)$").unwrap());

static VALUE_ALIAS_WHO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^show me all (\S+) (\S+) who (\S+) (.+)$").unwrap());

static ENTITY_WHO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^show me all (\S+) who (\S+) (.+)$").unwrap());

static VALUE_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^show me all (\S+) (\S+)$").unwrap());

static PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^show me(?: all)?\s*").unwrap());

/// Translates template phrases into predicates over a table's columns.
#[derive(Debug, Clone, Default)]
pub struct QueryTranslator {
    /// Lower-cased alias word to column name.
    aliases: IndexMap<String, String>,
}

impl QueryTranslator {
    /// Translator with an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an alias word (case-insensitive) to a column.
    pub fn with_alias(mut self, alias: &str, column: impl Into<String>) -> Self {
        self.aliases.insert(alias.to_lowercase(), column.into());
        self
    }

    /// Configured aliases in insertion order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// Conjunction of predicates for `text` against `schema`.
    pub fn translate(&self, text: &str, schema: &Schema) -> Result<Vec<Predicate>> {
        let query = clean(text);

        if let Some(caps) = ROWS_WHERE_CONTAINS.captures(&query) {
            let column = self.resolve(&caps[1], schema)?;
            return Ok(vec![contains_ignore_case(column, &caps[2])?]);
        }
        if let Some(caps) = ROWS_WHERE_IS.captures(&query) {
            let column = self.resolve(&caps[1], schema)?;
            return Ok(vec![equals_ignore_case(column, &caps[2])?]);
        }
        let mut unresolved_alias = None;
        if let Some(caps) = VALUE_ALIAS_WHO.captures(&query) {
            // an unknown alias may still read as the entity form
            match self.resolve(&caps[2], schema) {
                Ok(column) => {
                    let verb_column = self.resolve(&caps[3], schema)?;
                    return Ok(vec![
                        equals_ignore_case(column, &caps[1])?,
                        contains_ignore_case(verb_column, &caps[4])?,
                    ]);
                }
                Err(err) => unresolved_alias = Some(err),
            }
        }
        if let Some(caps) = ENTITY_WHO.captures(&query) {
            let verb_column = self.resolve(&caps[2], schema)?;
            return Ok(vec![contains_ignore_case(verb_column, &caps[3])?]);
        }
        if let Some(err) = unresolved_alias {
            return Err(err);
        }
        if let Some(caps) = VALUE_ALIAS.captures(&query) {
            let column = self.resolve(&caps[2], schema)?;
            return Ok(vec![equals_ignore_case(column, &caps[1])?]);
        }

        Err(TabulaError::QueryParse {
            fragment: PREFIX.replace(&query, "").into_owned(),
        })
    }

    fn resolve<'s>(&'s self, alias: &str, schema: &'s Schema) -> Result<&'s str> {
        let lowered = alias.to_lowercase();
        if let Some(column) = self.aliases.get(&lowered) {
            return Ok(column.as_str());
        }
        schema
            .names()
            .find(|name| name.to_lowercase() == lowered)
            .ok_or_else(|| TabulaError::QueryParse {
                fragment: alias.to_string(),
            })
    }
}

/// Trim, collapse runs of whitespace and drop trailing punctuation.
fn clean(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '?', '!'])
        .trim_end()
        .to_string()
}

fn equals_ignore_case(column: &str, value: &str) -> Result<Predicate> {
    Predicate::matches(column, &format!("(?i)^{}$", regex::escape(value)))
}

fn contains_ignore_case(column: &str, value: &str) -> Result<Predicate> {
    Predicate::matches(column, &format!("(?i){}", regex::escape(value)))
}

impl Table {
    /// Filter rows with a template query such as
    /// `"show me all female students who took math"`.
    pub fn pseudo_natural_query(&self, text: &str, translator: &QueryTranslator) -> Result<Table> {
        let predicates = translator.translate(text, self.schema())?;
        debug!(query = text, predicates = ?predicates, "translated query");
        self.filter(&predicates)
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

    fn students() -> Table {
        make_table(
            vec!["Name", "Gender", "Courses"],
            vec![
                vec!["Ann", "Female", "CS; Math"],
                vec!["Bob", "Male", "Math"],
                vec!["Cid", "Male", "Art"],
                vec!["Dee", "female", "Art; CS"],
            ],
        )
    }

    fn translator() -> QueryTranslator {
        QueryTranslator::new()
            .with_alias("students", "Gender")
            .with_alias("took", "Courses")
    }

    fn names(t: &Table) -> Vec<&str> {
        t.column("Name").unwrap().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_value_alias_who_template() {
        let t = students()
            .pseudo_natural_query("Show me all female students who took CS", &translator())
            .unwrap();
        assert_eq!(names(&t), vec!["Ann", "Dee"]);
    }

    #[test]
    fn test_entity_who_template() {
        let t = students()
            .pseudo_natural_query("show me all students who took math?", &translator())
            .unwrap();
        assert_eq!(names(&t), vec!["Ann", "Bob"]);
    }

    #[test]
    fn test_rows_where_templates() {
        let tr = translator();
        let is = students()
            .pseudo_natural_query("show me all rows where gender is MALE", &tr)
            .unwrap();
        assert_eq!(names(&is), vec!["Bob", "Cid"]);

        let contains = students()
            .pseudo_natural_query("show me all rows where courses contains art", &tr)
            .unwrap();
        assert_eq!(names(&contains), vec!["Cid", "Dee"]);
    }

    #[test]
    fn test_value_alias_template() {
        let t = students()
            .pseudo_natural_query("show me all male students", &translator())
            .unwrap();
        assert_eq!(names(&t), vec!["Bob", "Cid"]);
    }

    #[test]
    fn test_values_are_literal_not_patterns() {
        let t = make_table(vec!["code"], vec![vec!["a.c"], vec!["abc"]]);
        let out = t
            .pseudo_natural_query("show me all rows where code is a.c", &QueryTranslator::new())
            .unwrap();
        assert_eq!(out.row_count(), 1);
    }

    #[test]
    fn test_unparsed_fragment_reported() {
        match students().pseudo_natural_query("show me everything", &translator()) {
            Err(TabulaError::QueryParse { fragment }) => assert_eq!(fragment, "everything"),
            other => panic!("unexpected result: {:?}", other),
        }
        match students().pseudo_natural_query("list rows", &translator()) {
            Err(TabulaError::QueryParse { fragment }) => assert_eq!(fragment, "list rows"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_alias_reported() {
        match students().pseudo_natural_query("show me all tall teachers", &translator()) {
            Err(TabulaError::QueryParse { fragment }) => assert_eq!(fragment, "teachers"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_alias_in_who_template_reported() {
        let query = "show me all tall teachers who took CS";
        match students().pseudo_natural_query(query, &translator()) {
            Err(TabulaError::QueryParse { fragment }) => assert_eq!(fragment, "teachers"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
