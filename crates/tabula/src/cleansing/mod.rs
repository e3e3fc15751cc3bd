//! Data cleansing: missing values, text normalization, masking and the
//! AutoNormalize analyzer.
//!
//! All operations follow the table's persistent-value rule and return a new
//! [`Table`](crate::table::Table).

mod analyzer;
mod missing;
mod strategy;
mod text;

pub use analyzer::{AutoNormalizeConfig, NormalizationAnalysis, NormalizationAnalyzer};
pub use strategy::{MaskingStrategy, MissingValueStrategy, NormalizationStrategy};
