//! Delimited-text loader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::source::SourceMetadata;
use crate::error::{Result, TabulaError};
use crate::table::Table;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled for delimiter detection.
const DETECTION_LINES: usize = 10;

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the first record names the columns.
    pub has_header: bool,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl LoadOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

/// Reads delimited text into a [`Table`].
///
/// Column names come from the header in source order (`column_1`,
/// `column_2`, ... without one); every cell stays text and rows keep
/// source order.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    /// Create a loader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom options.
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load a file and describe where it came from.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let io_error = |source| TabulaError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_error)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = self.delimiter_for(&contents)?;
        let table = self.parse_with(&contents, delimiter)?;

        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            delimiter = %(delimiter as char).escape_default(),
            "loaded table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            delimiter,
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }

    /// Parse in-memory bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let delimiter = self.delimiter_for(bytes)?;
        self.parse_with(bytes, delimiter)
    }

    /// Parse in-memory text.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        self.parse_bytes(text.as_bytes())
    }

    /// Read everything from `reader` and parse it.
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<Table> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|source| TabulaError::Io {
            path: "<reader>".into(),
            source,
        })?;
        self.parse_bytes(&contents)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.options.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes, self.options.quote),
        }
    }

    fn parse_with(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.options.quote)
            .flexible(true)
            .from_reader(bytes);
        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record.map_err(record_error)?,
            None => return Err(TabulaError::Format("no data to load".to_string())),
        };

        let (headers, mut rows): (Vec<String>, Vec<Vec<String>>) = if self.options.has_header {
            (first.iter().map(String::from).collect(), Vec::new())
        } else {
            let headers = (1..=first.len()).map(|i| format!("column_{}", i)).collect();
            (headers, vec![first.iter().map(String::from).collect()])
        };

        for result in records {
            if self.options.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let record = result.map_err(record_error)?;
            if record.len() != headers.len() {
                return Err(TabulaError::Format(format!(
                    "row {} has {} fields, expected {}",
                    rows.len() + 1,
                    record.len(),
                    headers.len()
                )));
            }
            rows.push(record.iter().map(String::from).collect());
        }
        if let Some(max) = self.options.max_rows {
            rows.truncate(max);
        }

        Table::from_rows(headers, rows)
    }
}

/// How one candidate delimiter splits the sampled lines. Compared field by
/// field: uniform splits first, then near-uniform, then more separators,
/// then tab.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SplitScore {
    uniform: bool,
    near_uniform: bool,
    separators: usize,
    tab: bool,
}

impl SplitScore {
    /// None when the delimiter does not occur in the first line.
    fn of(lines: &[String], delimiter: u8, quote: u8) -> Option<Self> {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| unquoted_count(line, delimiter, quote))
            .collect();
        let separators = *counts.first().filter(|&&c| c > 0)?;
        let low = counts.iter().copied().min().unwrap_or(separators);
        let high = counts.iter().copied().max().unwrap_or(separators);
        Some(Self {
            uniform: low == high,
            near_uniform: high - low <= 1,
            separators,
            tab: delimiter == b'\t',
        })
    }
}

/// Pick the delimiter that splits the first non-blank lines most evenly,
/// comma when none occurs.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(DETECTION_LINES)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(TabulaError::Format("no lines to detect a delimiter from".to_string()));
    }

    // reversed so that equal scores resolve to the earlier candidate
    let best = DELIMITERS
        .iter()
        .rev()
        .filter_map(|&d| SplitScore::of(&lines, d, quote).map(|score| (score, d)))
        .max_by(|a, b| a.0.cmp(&b.0));
    Ok(best.map_or(b',', |(_, d)| d))
}

/// Occurrences of `delimiter` outside quoted sections.
fn unquoted_count(line: &str, delimiter: u8, quote: u8) -> usize {
    let mut quoted = false;
    line.bytes()
        .filter(|&b| {
            if b == quote {
                quoted = !quoted;
            }
            !quoted && b == delimiter
        })
        .count()
}

/// Undecodable or ragged records are format errors; anything else stays a
/// csv error.
fn record_error(err: csv::Error) -> TabulaError {
    match err.kind() {
        csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => {
            TabulaError::Format(err.to_string())
        }
        _ => TabulaError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6", b'"').unwrap(), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3", b'"').unwrap(), b'\t');
        assert_eq!(detect_delimiter(b"a;b\n\"x;y\";2", b'"').unwrap(), b';');
        assert_eq!(detect_delimiter(b"a;b\n'x;y';2", b'\'').unwrap(), b';');
        assert_eq!(detect_delimiter(b"single\ncolumn", b'"').unwrap(), b',');
        assert!(detect_delimiter(b"\n  \n", b'"').is_err());
    }

    #[test]
    fn test_parse_keeps_source_order_as_text() {
        let table = Loader::new()
            .parse_str("name,age,city\nAlice,30,NYC\nBob,25,LA")
            .unwrap();
        assert_eq!(table.column_names(), vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "name"), Some("Alice"));
        assert_eq!(table.cell(1, "age"), Some("25"));
    }

    #[test]
    fn test_quoted_fields() {
        let table = Loader::new()
            .parse_str("id,note\n1,\"hello, world\"\n2,plain")
            .unwrap();
        assert_eq!(table.cell(0, "note"), Some("hello, world"));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = Loader::new().parse_str("a,b\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_without_header() {
        let options = LoadOptions::default().with_header(false).with_delimiter(b'|');
        let table = Loader::with_options(options).parse_str("x|1\ny|2").unwrap();
        assert_eq!(table.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let options = LoadOptions::default().with_max_rows(1);
        let table = Loader::with_options(options).parse_str("a\n1\n2\n3").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_malformed_input() {
        let loader = Loader::new();
        assert!(matches!(
            loader.parse_str("a,b\n1,2\n3"),
            Err(TabulaError::Format(msg)) if msg.contains("row 2")
        ));
        assert!(matches!(loader.parse_str(""), Err(TabulaError::Format(_))));
        assert!(matches!(loader.parse_str("a,a\n1,2"), Err(TabulaError::Schema(_))));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let loader = Loader::new();
        assert!(matches!(
            loader.parse_bytes(b"a,b\n\xff\xfe,1"),
            Err(TabulaError::Format(_))
        ));
        let fixed = Loader::with_options(LoadOptions::default().with_delimiter(b','));
        assert!(matches!(
            fixed.parse_bytes(b"\xff,b\n1,2"),
            Err(TabulaError::Format(_))
        ));
    }
}
