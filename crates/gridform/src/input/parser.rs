//! Delimited-text parser with delimiter detection.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{GridformError, Result};
use crate::record::RawRecord;
use super::source::{ParsedTable, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the input has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text into header-keyed raw records.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(ParsedTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| GridformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse_bytes(name, &contents)
    }

    /// Parse in-memory text, e.g. the contents of a dropped file.
    pub fn parse_str(&self, name: &str, text: &str) -> Result<(ParsedTable, SourceMetadata)> {
        self.parse_bytes(name, text.as_bytes())
    }

    /// Parse raw bytes and compute source metadata.
    pub fn parse_bytes(&self, name: impl Into<String>, contents: &[u8]) -> Result<(ParsedTable, SourceMetadata)> {
        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(contents)?,
        };

        let table = self.parse_delimited(contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            name,
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<ParsedTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(record_error)?;
            if is_blank(&record) {
                continue;
            }
            records.push(record);
        }

        let fields: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .enumerate()
                .map(|(i, h)| header_name(i, h))
                .collect()
        } else {
            match records.first() {
                Some(first) => (0..first.len()).map(|i| format!("column_{}", i + 1)).collect(),
                None => return Err(GridformError::EmptyData("No data rows found".to_string())),
            }
        };

        if fields.is_empty() {
            return Err(GridformError::EmptyData("No columns found".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(GridformError::DuplicateHeader(field.clone()));
            }
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let data: Vec<RawRecord> = records
            .iter()
            .take(limit)
            .map(|record| {
                // Short rows are padded with empty cells; extra cells are dropped.
                fields
                    .iter()
                    .enumerate()
                    .map(|(i, field)| (field.clone(), record.get(i).unwrap_or("").to_string()))
                    .collect()
            })
            .collect();

        Ok(ParsedTable::new(fields, data))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Name for a header cell; empty cells get a positional name.
fn header_name(index: usize, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", index + 1)
    } else {
        trimmed.to_string()
    }
}

/// Whitespace-only lines never become records. A line of bare delimiters
/// is a record of empty cells and is kept.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

fn record_error(err: csv::Error) -> GridformError {
    match err.position() {
        Some(pos) => GridformError::Parse {
            row: pos.line() as usize,
            column: 0,
            message: err.to_string(),
        },
        None => GridformError::Csv(err),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(GridformError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a slight bonus; it rarely appears inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
