//! Heuristic per-column text analysis driving AutoNormalize.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::NormalizationStrategy;
use crate::error::Result;
use crate::schema::CellType;
use crate::table::Table;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Matched against lower-cased values so results do not depend on casing.

/// Two to four name-like words ("mary o'neil", "jean-luc picard").
static MULTI_WORD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z'.-]*(?: [a-z][a-z'.-]*){1,3}$").unwrap()
});

/// One to four name-like words, used when the column name hints at names.
static ANY_WORD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z'.-]*(?: [a-z][a-z'.-]*){0,3}$").unwrap()
});

/// Words followed by a trailing number ("room 12", "batch7").
static NUMERIC_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z ]*\d+$").unwrap());

/// Punctuation that ordinary prose and names contain.
const ORDINARY_PUNCTUATION: &[char] = &['.', ',', '\'', '-', '&', '(', ')', '!', '?'];

/// Thresholds for [`NormalizationAnalyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoNormalizeConfig {
    /// Share of fully upper-case values at which a column is recased.
    pub uppercase_threshold: f64,
    /// Case inconsistency at which a column is recased.
    pub inconsistency_threshold: f64,
    /// Share of values a pattern must cover to raise its flag.
    pub flag_ratio: f64,
    /// Share of values with unusual symbols marking a column as code-like.
    pub special_char_ratio: f64,
    /// Average words per value from which a column reads as prose.
    pub sentence_word_threshold: f64,
}

impl Default for AutoNormalizeConfig {
    fn default() -> Self {
        Self {
            uppercase_threshold: 0.6,
            inconsistency_threshold: 0.2,
            flag_ratio: 0.5,
            special_char_ratio: 0.3,
            sentence_word_threshold: 5.0,
        }
    }
}

impl AutoNormalizeConfig {
    pub fn with_uppercase_threshold(mut self, threshold: f64) -> Self {
        self.uppercase_threshold = threshold;
        self
    }

    pub fn with_inconsistency_threshold(mut self, threshold: f64) -> Self {
        self.inconsistency_threshold = threshold;
        self
    }

    pub fn with_flag_ratio(mut self, ratio: f64) -> Self {
        self.flag_ratio = ratio;
        self
    }

    pub fn with_special_char_ratio(mut self, ratio: f64) -> Self {
        self.special_char_ratio = ratio;
        self
    }

    pub fn with_sentence_word_threshold(mut self, words: f64) -> Self {
        self.sentence_word_threshold = words;
        self
    }
}

/// Metrics computed for one column. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationAnalysis {
    pub column: String,
    /// At least half of the non-blank cells are text rather than numbers.
    pub is_text: bool,
    /// Non-blank cells considered.
    pub value_count: usize,
    /// `1 - share of the dominant casing pattern` among cased values.
    pub case_inconsistency: f64,
    /// Share of values repeating an earlier value, ignoring case.
    pub duplicate_pct: f64,
    pub is_personal_name: bool,
    pub has_sentence_structure: bool,
    pub has_space_separated_data: bool,
    pub has_mixed_alphanumeric: bool,
    pub has_special_characters: bool,
    /// Share of cased values written entirely in upper case.
    pub uppercase_pct: f64,
    pub numeric_suffix_pct: f64,
    /// Share of values containing a symbol outside ordinary punctuation.
    pub special_char_pct: f64,
    pub avg_words_per_value: f64,
    /// Strategy chosen by precedence, if any.
    pub recommended: Option<NormalizationStrategy>,
}

impl NormalizationAnalysis {
    /// Identifier-like columns that recasing would corrupt.
    pub fn is_code_like(&self) -> bool {
        self.has_mixed_alphanumeric || self.has_special_characters || self.has_space_separated_data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CasePattern {
    Upper,
    Lower,
    Capitalized,
    Title,
    Mixed,
}

impl CasePattern {
    /// Classify a value with at least one letter.
    fn of(value: &str) -> Option<Self> {
        let letters: Vec<char> = value.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return None;
        }
        if letters.iter().all(|c| !c.is_uppercase()) {
            return Some(CasePattern::Lower);
        }
        if letters.len() > 1 && letters.iter().all(|c| !c.is_lowercase()) {
            return Some(CasePattern::Upper);
        }
        if letters[0].is_uppercase() && letters[1..].iter().all(|c| !c.is_uppercase()) {
            return Some(CasePattern::Capitalized);
        }
        let title = value.split_whitespace().all(|word| {
            let mut word_letters = word.chars().filter(|c| c.is_alphabetic());
            match word_letters.next() {
                Some(first) => first.is_uppercase() && word_letters.all(|c| !c.is_uppercase()),
                None => true,
            }
        });
        Some(if title { CasePattern::Title } else { CasePattern::Mixed })
    }
}

/// Scores columns and picks a normalization strategy for each.
pub struct NormalizationAnalyzer {
    config: AutoNormalizeConfig,
}

impl Default for NormalizationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationAnalyzer {
    /// Create an analyzer with default thresholds.
    pub fn new() -> Self {
        Self {
            config: AutoNormalizeConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: AutoNormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoNormalizeConfig {
        &self.config
    }

    /// Analyze one column given its name and cells.
    pub fn analyze_column(&self, name: &str, cells: &[String]) -> NormalizationAnalysis {
        let values: Vec<&str> = cells
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let lowered: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
        let count = values.len();

        let text_count = values
            .iter()
            .filter(|v| CellType::of(v) == CellType::Text)
            .count();
        let is_text = count > 0 && text_count * 2 >= count;

        // Case metrics: the only ones that look at the original casing.
        let patterns: Vec<CasePattern> = values.iter().filter_map(|v| CasePattern::of(v)).collect();
        let (case_inconsistency, uppercase_pct) = case_scores(&patterns);

        let distinct: HashSet<&str> = lowered.iter().map(String::as_str).collect();
        let duplicate_pct = ratio(count - distinct.len(), count);

        let word_counts: Vec<usize> = lowered.iter().map(|v| v.split_whitespace().count()).collect();
        let avg_words_per_value = ratio(word_counts.iter().sum(), count);

        let share = |pred: &dyn Fn(&str) -> bool| {
            ratio(lowered.iter().filter(|v| pred(v.as_str())).count(), count)
        };

        let flag_ratio = self.config.flag_ratio;
        let name_hint = name.to_lowercase().contains("name");
        let is_personal_name = count > 0
            && (share(&|v: &str| MULTI_WORD_NAME.is_match(v)) >= flag_ratio
                || (name_hint && share(&|v: &str| ANY_WORD_NAME.is_match(v)) >= flag_ratio));

        let has_sentence_structure = count > 0
            && (avg_words_per_value >= self.config.sentence_word_threshold
                || share(&|v: &str| {
                    v.ends_with(['.', '!', '?']) && v.split_whitespace().count() >= 3
                }) >= flag_ratio);

        let has_space_separated_data = count > 0 && share(&is_space_separated_data) >= flag_ratio;
        let has_mixed_alphanumeric = count > 0 && share(&has_mixed_token) >= flag_ratio;
        let special_char_pct = share(&has_special_char);
        let has_special_characters = count > 0 && special_char_pct >= self.config.special_char_ratio;
        let numeric_suffix_pct = share(&|v: &str| NUMERIC_SUFFIX.is_match(v));

        let mut analysis = NormalizationAnalysis {
            column: name.to_string(),
            is_text,
            value_count: count,
            case_inconsistency,
            duplicate_pct,
            is_personal_name,
            has_sentence_structure,
            has_space_separated_data,
            has_mixed_alphanumeric,
            has_special_characters,
            uppercase_pct,
            numeric_suffix_pct,
            special_char_pct,
            avg_words_per_value,
            recommended: None,
        };
        analysis.recommended = self.recommend(&analysis);
        analysis
    }

    /// Precedence: code-like columns are never recased, then names, prose,
    /// shouting and finally inconsistent casing.
    fn recommend(&self, analysis: &NormalizationAnalysis) -> Option<NormalizationStrategy> {
        if !analysis.is_text
            || analysis.is_code_like()
            || analysis.numeric_suffix_pct >= self.config.flag_ratio
        {
            return None;
        }
        if analysis.is_personal_name {
            return Some(NormalizationStrategy::NameCase);
        }
        if analysis.has_sentence_structure
            || analysis.uppercase_pct >= self.config.uppercase_threshold
            || analysis.case_inconsistency >= self.config.inconsistency_threshold
        {
            return Some(NormalizationStrategy::SentenceCase);
        }
        None
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `(1 - dominant share, upper-case share)` over classified values.
fn case_scores(patterns: &[CasePattern]) -> (f64, f64) {
    if patterns.is_empty() {
        return (0.0, 0.0);
    }
    let counts = [
        CasePattern::Upper,
        CasePattern::Lower,
        CasePattern::Capitalized,
        CasePattern::Title,
        CasePattern::Mixed,
    ]
    .map(|p| patterns.iter().filter(|&&q| q == p).count());
    let dominant = counts.iter().copied().max().unwrap_or(0);
    (
        1.0 - ratio(dominant, patterns.len()),
        ratio(counts[0], patterns.len()),
    )
}

/// Several tokens, at least half of them carrying digits ("12 34 56", "a1 b2").
fn is_space_separated_data(value: &str) -> bool {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() < 2 {
        return false;
    }
    let numeric = tokens
        .iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .count();
    numeric * 2 >= tokens.len()
}

fn has_mixed_token(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        token.chars().any(|c| c.is_alphabetic()) && token.chars().any(|c| c.is_ascii_digit())
    })
}

fn has_special_char(value: &str) -> bool {
    value
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace() && !ORDINARY_PUNCTUATION.contains(&c))
}

impl Table {
    /// Normalization metrics for every column, in column order.
    pub fn analyze_normalization(&self) -> Vec<NormalizationAnalysis> {
        self.analyze_normalization_with(&AutoNormalizeConfig::default())
    }

    /// Same as [`Table::analyze_normalization`] with custom thresholds.
    pub fn analyze_normalization_with(
        &self,
        config: &AutoNormalizeConfig,
    ) -> Vec<NormalizationAnalysis> {
        let analyzer = NormalizationAnalyzer::with_config(config.clone());
        self.schema()
            .names()
            .enumerate()
            .map(|(index, name)| analyzer.analyze_column(name, self.column_at(index)))
            .collect()
    }

    /// Recase every text column whose analysis recommends a strategy.
    ///
    /// Columns already in the recommended form are left alone, so applying
    /// this twice gives the same table as applying it once.
    pub fn auto_normalize(&self) -> Table {
        self.auto_normalize_with(&AutoNormalizeConfig::default())
    }

    /// Same as [`Table::auto_normalize`] with custom thresholds.
    pub fn auto_normalize_with(&self, config: &AutoNormalizeConfig) -> Table {
        let mut table = self.clone();
        for (index, analysis) in self.analyze_normalization_with(config).into_iter().enumerate() {
            if !analysis.is_text {
                continue;
            }
            let Some(strategy) = analysis.recommended else {
                if analysis.is_code_like() {
                    warn!(column = %analysis.column, "skipping code-like column");
                }
                continue;
            };

            let cells = table.cells_mut(index);
            if cells.iter().all(|c| strategy.apply(c) == *c) {
                continue;
            }
            for cell in cells.iter_mut() {
                *cell = strategy.apply(cell);
            }
            debug!(column = %analysis.column, ?strategy, "auto-normalized column");
        }
        table
    }

    /// Analysis of a single named column.
    pub fn analyze_column_normalization(&self, column: &str) -> Result<NormalizationAnalysis> {
        let index = self.schema().require(column)?;
        Ok(NormalizationAnalyzer::new().analyze_column(column, self.column_at(index)))
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

    fn column(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_case_patterns() {
        assert_eq!(CasePattern::of("HELLO"), Some(CasePattern::Upper));
        assert_eq!(CasePattern::of("hello"), Some(CasePattern::Lower));
        assert_eq!(CasePattern::of("Hello there"), Some(CasePattern::Capitalized));
        assert_eq!(CasePattern::of("Hello There"), Some(CasePattern::Title));
        assert_eq!(CasePattern::of("hELLo"), Some(CasePattern::Mixed));
        assert_eq!(CasePattern::of("123"), None);
    }

    #[test]
    fn test_personal_names_get_name_case() {
        let analyzer = NormalizationAnalyzer::new();
        let analysis = analyzer.analyze_column(
            "customer",
            &column(&["JOHN SMITH", "mary o'neil", "Ann Lee"]),
        );
        assert!(analysis.is_personal_name);
        assert_eq!(analysis.recommended, Some(NormalizationStrategy::NameCase));

        // single words count only with a name hint
        let plain = analyzer.analyze_column("city", &column(&["oslo", "rome"]));
        assert!(!plain.is_personal_name);
        let hinted = analyzer.analyze_column("first_name", &column(&["anna", "bob"]));
        assert!(hinted.is_personal_name);
    }

    #[test]
    fn test_shouting_gets_sentence_case() {
        let analysis = NormalizationAnalyzer::new()
            .analyze_column("status", &column(&["ACTIVE", "PENDING", "CLOSED", "Active"]));
        assert!((analysis.uppercase_pct - 0.75).abs() < 1e-12);
        assert_eq!(analysis.recommended, Some(NormalizationStrategy::SentenceCase));
    }

    #[test]
    fn test_code_like_columns_untouched() {
        let analyzer = NormalizationAnalyzer::new();
        let ids = analyzer.analyze_column("sku", &column(&["AB12", "cd34", "Ef56"]));
        assert!(ids.has_mixed_alphanumeric);
        assert_eq!(ids.recommended, None);

        let emails = analyzer.analyze_column("email", &column(&["A@X.COM", "b@y.org"]));
        assert!(emails.has_special_characters);
        assert_eq!(emails.recommended, None);

        let coords = analyzer.analyze_column("pos", &column(&["12 34", "56 78"]));
        assert!(coords.has_space_separated_data);
    }

    #[test]
    fn test_numeric_column_is_not_text() {
        let analysis = NormalizationAnalyzer::new().analyze_column("n", &column(&["1", "2.5", "x"]));
        assert!(!analysis.is_text);
        assert_eq!(analysis.recommended, None);
    }

    #[test]
    fn test_consistent_column_untouched() {
        let t = make_table(vec!["fruit"], vec![vec!["apple"], vec!["banana"], vec!["cherry"]]);
        assert_eq!(t.auto_normalize(), t);
    }

    #[test]
    fn test_auto_normalize_applies_and_is_idempotent() {
        let t = make_table(
            vec!["name", "status", "sku"],
            vec![
                vec!["JOHN SMITH", "ACTIVE", "AB12"],
                vec!["mary o'neil", "PENDING", "cd34"],
                vec!["Ann Lee", "active", "Ef56"],
            ],
        );
        let once = t.auto_normalize();
        assert_eq!(once.cell(0, "name"), Some("John Smith"));
        assert_eq!(once.cell(1, "name"), Some("Mary O'Neil"));
        assert_eq!(once.cell(0, "status"), Some("Active"));
        assert_eq!(once.column("sku").unwrap(), t.column("sku").unwrap());
        assert_eq!(once.auto_normalize(), once);
    }

    #[test]
    fn test_auto_normalize_idempotent_with_long_s() {
        let t = make_table(vec!["notes"], vec![vec!["ſUE ANN"], vec!["ſam lee"]]);
        let once = t.auto_normalize();
        assert_eq!(once.cell(0, "notes"), Some("ſue ann"));
        assert_eq!(once.auto_normalize(), once);
    }

    #[test]
    fn test_custom_config() {
        let t = make_table(vec!["s"], vec![vec!["ABC"], vec!["def"], vec!["ghi"]]);
        // one upper-case value in three: below the default threshold but inconsistent
        let strict = AutoNormalizeConfig::default().with_inconsistency_threshold(0.9);
        assert_eq!(t.auto_normalize_with(&strict), t);
        assert_eq!(t.auto_normalize().cell(0, "s"), Some("Abc"));
    }
}
