//! Closed sets of cleansing strategies.
//!
//! Each strategy is a pure function: normalization and masking map one cell
//! to one cell, missing-value strategies map a column's present values to a
//! single fill value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabulaError};
use crate::schema::{format_number, parse_number};
use crate::stats;

/// Text casing applied per cell. Every variant is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// First letter of each sentence upper case, the rest lower case.
    SentenceCase,
    /// Everything upper case.
    UpperCase,
    /// Everything lower case.
    LowerCase,
    /// First letter of each name part upper case (`o'brien-smith` → `O'Brien-Smith`).
    NameCase,
}

impl NormalizationStrategy {
    /// Apply the strategy to one cell.
    pub fn apply(&self, cell: &str) -> String {
        match self {
            NormalizationStrategy::SentenceCase => sentence_case(cell),
            NormalizationStrategy::UpperCase => cell.to_uppercase(),
            NormalizationStrategy::LowerCase => cell.to_lowercase(),
            NormalizationStrategy::NameCase => name_case(cell),
        }
    }
}

/// Push the upper-case form of `ch` when it is a single character that
/// lowercases back to `ch`'s lower-case form. Otherwise (`ß` → `SS`,
/// `ſ` → `S` → `s`) push `ch` unchanged.
fn push_upper(out: &mut String, ch: char) {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u.to_lowercase().eq(ch.to_lowercase()) => out.push(u),
        _ => out.push(ch),
    }
}

fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize = true;
    let mut after_terminator = false;

    for ch in text.to_lowercase().chars() {
        if capitalize && ch.is_alphabetic() {
            push_upper(&mut out, ch);
            capitalize = false;
            after_terminator = false;
            continue;
        }
        if matches!(ch, '.' | '!' | '?') {
            after_terminator = true;
        } else if ch.is_whitespace() {
            if after_terminator {
                capitalize = true;
            }
        } else {
            after_terminator = false;
        }
        out.push(ch);
    }
    out
}

fn name_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize = true;

    for ch in text.to_lowercase().chars() {
        if ch.is_alphabetic() {
            if capitalize {
                push_upper(&mut out, ch);
            } else {
                out.push(ch);
            }
            capitalize = false;
        } else {
            out.push(ch);
            capitalize = ch.is_whitespace() || matches!(ch, '-' | '\'' | '.');
        }
    }
    out
}

/// Masking applied per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingStrategy {
    /// Leave the cell as is.
    #[default]
    None,
    /// Replace every character with `*`.
    Hidden,
    /// Keep the first and last character, star the rest.
    ShowEnds,
    /// Bucket a numeric age into a decade label such as `"20-29"`.
    AgeGroup,
}

impl MaskingStrategy {
    /// Apply the strategy to one cell.
    pub fn apply(&self, cell: &str) -> String {
        match self {
            MaskingStrategy::None => cell.to_string(),
            MaskingStrategy::Hidden => "*".repeat(cell.chars().count()),
            MaskingStrategy::ShowEnds => {
                let chars: Vec<char> = cell.chars().collect();
                if chars.len() <= 2 {
                    return cell.to_string();
                }
                let mut out = String::with_capacity(cell.len());
                out.push(chars[0]);
                out.push_str(&"*".repeat(chars.len() - 2));
                out.push(chars[chars.len() - 1]);
                out
            }
            MaskingStrategy::AgeGroup => age_group(cell),
        }
    }
}

/// Non-numeric and negative cells are returned unchanged.
fn age_group(cell: &str) -> String {
    match parse_number(cell) {
        Some(age) if age >= 0.0 => {
            let decade = (age / 10.0).floor() as u64 * 10;
            if decade >= 100 {
                "100+".to_string()
            } else {
                format!("{}-{}", decade, decade + 9)
            }
        }
        _ => cell.to_string(),
    }
}

/// How a column's missing cells are filled from its present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Largest present value.
    Max,
    /// Smallest present value.
    Min,
    /// Mean of present values.
    Mean,
    /// Median of present values.
    Median,
    /// Most frequent present value; ties go to the first seen.
    Mode,
}

impl MissingValueStrategy {
    /// Compute the fill value from a column's present values.
    ///
    /// Numeric strategies report the first unparseable value as a
    /// [`TabulaError::ValueConversion`] whose `row` is its position in
    /// `values` and whose `column` is empty; callers fill in both.
    pub fn fill_value(&self, values: &[&str]) -> Result<String> {
        if values.is_empty() {
            return Err(TabulaError::Argument(
                "no present values to derive a fill value from".to_string(),
            ));
        }

        let fill = match self {
            MissingValueStrategy::Mode => return Ok(mode(values)),
            MissingValueStrategy::Max => parse_all(values)?
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max),
            MissingValueStrategy::Min => parse_all(values)?
                .into_iter()
                .fold(f64::INFINITY, f64::min),
            MissingValueStrategy::Mean => stats::mean(&parse_all(values)?)?,
            MissingValueStrategy::Median => stats::median(&parse_all(values)?)?,
        };
        Ok(format_number(fill))
    }
}

fn parse_all(values: &[&str]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            parse_number(value).ok_or_else(|| TabulaError::ValueConversion {
                column: String::new(),
                row,
                value: value.to_string(),
            })
        })
        .collect()
}

/// Most frequent value, first seen on ties.
fn mode(values: &[&str]) -> String {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for &value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_case() {
        let s = NormalizationStrategy::SentenceCase;
        assert_eq!(s.apply("HELLO WORLD. HOW ARE YOU?"), "Hello world. How are you?");
        assert_eq!(s.apply("version 3.5 is out"), "Version 3.5 is out");
        assert_eq!(s.apply(""), "");
    }

    #[test]
    fn test_name_case() {
        let s = NormalizationStrategy::NameCase;
        assert_eq!(s.apply("JOHN o'brien-SMITH"), "John O'Brien-Smith");
        assert_eq!(s.apply("mary ann"), "Mary Ann");
    }

    #[test]
    fn test_upper_case_that_does_not_lowercase_back_is_kept() {
        // long s upper-cases to S, which lower-cases to a different letter
        assert_eq!(NormalizationStrategy::SentenceCase.apply("ſAM LEE"), "ſam lee");
        assert_eq!(NormalizationStrategy::NameCase.apply("ſam lee"), "ſam Lee");
        assert_eq!(NormalizationStrategy::NameCase.apply("éva"), "Éva");
    }

    #[test]
    fn test_normalization_idempotent() {
        let samples = ["hELLO there. gENERAL kenobi!", "o'neil", "ALL CAPS", "ßtraße", "İstanbul", "ſUE ANN"];
        for strategy in [
            NormalizationStrategy::SentenceCase,
            NormalizationStrategy::UpperCase,
            NormalizationStrategy::LowerCase,
            NormalizationStrategy::NameCase,
        ] {
            for sample in samples {
                let once = strategy.apply(sample);
                assert_eq!(strategy.apply(&once), once, "{:?} on {:?}", strategy, sample);
            }
        }
    }

    #[test]
    fn test_masking() {
        assert_eq!(MaskingStrategy::None.apply("secret"), "secret");
        assert_eq!(MaskingStrategy::Hidden.apply("secret"), "******");
        assert_eq!(MaskingStrategy::ShowEnds.apply("secret"), "s****t");
        assert_eq!(MaskingStrategy::ShowEnds.apply("ab"), "ab");
        assert_eq!(MaskingStrategy::AgeGroup.apply("34"), "30-39");
        assert_eq!(MaskingStrategy::AgeGroup.apply("9.5"), "0-9");
        assert_eq!(MaskingStrategy::AgeGroup.apply("104"), "100+");
        assert_eq!(MaskingStrategy::AgeGroup.apply("N/A"), "N/A");
        assert_eq!(MaskingStrategy::AgeGroup.apply("-3"), "-3");
    }

    #[test]
    fn test_fill_values() {
        let values = ["3", "1", "4", "1"];
        assert_eq!(MissingValueStrategy::Max.fill_value(&values).unwrap(), "4");
        assert_eq!(MissingValueStrategy::Min.fill_value(&values).unwrap(), "1");
        assert_eq!(MissingValueStrategy::Mean.fill_value(&values).unwrap(), "2.25");
        assert_eq!(MissingValueStrategy::Median.fill_value(&values).unwrap(), "2");
        assert_eq!(MissingValueStrategy::Mode.fill_value(&values).unwrap(), "1");
        assert_eq!(MissingValueStrategy::Mode.fill_value(&["b", "a", "a", "b"]).unwrap(), "b");
    }

    #[test]
    fn test_fill_value_errors() {
        assert!(matches!(
            MissingValueStrategy::Mean.fill_value(&[]),
            Err(TabulaError::Argument(_))
        ));
        assert!(matches!(
            MissingValueStrategy::Max.fill_value(&["1", "x"]),
            Err(TabulaError::ValueConversion { row: 1, .. })
        ));
    }
}
