//! On-demand typed interpretation of text cells.

use serde::{Deserialize, Serialize};

/// Type a single text cell reads as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Finite floating-point numbers.
    Float,
    /// Anything else that is not blank.
    Text,
    /// Blank or whitespace-only.
    Empty,
}

impl CellType {
    /// Classify a cell.
    pub fn of(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return CellType::Empty;
        }
        if trimmed.parse::<i64>().is_ok() {
            return CellType::Integer;
        }
        if parse_number(trimmed).is_some() {
            return CellType::Float;
        }
        CellType::Text
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellType::Integer | CellType::Float)
    }
}

/// Parse a cell as a finite decimal number.
///
/// `"NaN"` and `"inf"` parse as `f64` but are not treated as numbers here.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Render a number as cell text.
///
/// Integral values print without a fractional part (`7`, not `7.0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}
