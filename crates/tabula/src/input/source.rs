//! Provenance of a loaded table.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the file a table was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    pub path: PathBuf,
    /// SHA-256 of the raw file bytes, as `sha256:<hex>`.
    pub hash: String,
    pub size_bytes: u64,
    /// Format implied by the delimiter (`csv`, `tsv`, `psv`, ...).
    pub format: String,
    pub delimiter: char,
    /// Data rows read (excluding the header).
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub(crate) fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        delimiter: u8,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format: format_name(delimiter).to_string(),
            delimiter: delimiter as char,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}
