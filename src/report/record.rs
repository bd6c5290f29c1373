//! Row parsing for duplicate reports.
//!
//! # Columns
//!
//! Rows are tab-separated. Only three columns are used:
//!
//! - field 0: group id shared by all copies of one logical file
//! - field 2: absolute path of the copy
//! - field 3: size in bytes
//!
//! Every extracted field has its double quotes and null bytes removed. The
//! size column is kept as text and only parsed when freed space is accounted.

use std::path::PathBuf;

use super::ReportError;

/// Minimum number of tab-separated fields a content row must carry.
pub const REQUIRED_FIELDS: usize = 4;

const GROUP_ID_FIELD: usize = 0;
const PATH_FIELD: usize = 2;
const SIZE_FIELD: usize = 3;

/// One data row of a duplicate report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    group_id: i64,
    path: String,
    size_text: String,
    line: usize,
}

impl DuplicateRecord {
    /// Create a record from already sanitized parts.
    #[must_use]
    pub fn new(
        group_id: i64,
        path: impl Into<String>,
        size_text: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            group_id,
            path: path.into(),
            size_text: size_text.into(),
            line,
        }
    }

    /// Parse one non-blank content line.
    ///
    /// # Arguments
    ///
    /// * `text` - Line text with null bytes already removed
    /// * `line` - Content line number, used in errors and progress output
    ///
    /// # Errors
    ///
    /// Returns `MalformedRow` if the row has fewer than four fields or the
    /// group id is not an integer.
    pub fn parse(text: &str, line: usize) -> Result<Self, ReportError> {
        let fields: Vec<&str> = text.split('\t').collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(ReportError::MalformedRow {
                line,
                reason: format!(
                    "expected at least {REQUIRED_FIELDS} tab-separated fields, found {}",
                    fields.len()
                ),
            });
        }

        let id_text = sanitize_field(fields[GROUP_ID_FIELD]);
        let group_id = id_text
            .trim()
            .parse::<i64>()
            .map_err(|_| ReportError::MalformedRow {
                line,
                reason: format!("group id {id_text:?} is not an integer"),
            })?;

        Ok(Self {
            group_id,
            path: sanitize_field(fields[PATH_FIELD]),
            size_text: sanitize_field(fields[SIZE_FIELD]),
            line,
        })
    }

    /// Group id shared with the other copies.
    #[must_use]
    pub fn group_id(&self) -> i64 {
        self.group_id
    }

    /// Path as listed in the report (quotes and nulls removed).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw size column.
    #[must_use]
    pub fn size_text(&self) -> &str {
        &self.size_text
    }

    /// Content line this record was parsed from.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Size in bytes as reported by the scanner.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSize` if the size column is not a non-negative integer.
    pub fn size_bytes(&self) -> Result<u64, ReportError> {
        self.size_text
            .trim()
            .parse::<u64>()
            .map_err(|_| ReportError::MalformedSize {
                path: self.path.clone(),
                value: self.size_text.clone(),
            })
    }
}

/// Remove double quotes and null bytes from a field.
#[must_use]
pub fn sanitize_field(field: &str) -> String {
    field.chars().filter(|&c| c != '"' && c != '\0').collect()
}

/// Whitespace as the report tooling understands it: ASCII only.
///
/// Bytes such as 0xA0 (no-break space) decode to characters Unicode treats as
/// whitespace, but in a report they are part of a file name.
#[must_use]
pub fn is_report_whitespace(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Turn a record path into the path handed to the remover.
///
/// Quotes and null bytes are always removed. With `strip_whitespace` every
/// ASCII whitespace character is removed, embedded ones included; otherwise
/// only the ends are trimmed.
#[must_use]
pub fn sanitize_path(path: &str, strip_whitespace: bool) -> PathBuf {
    let cleaned = sanitize_field(path);
    if strip_whitespace {
        PathBuf::from(
            cleaned
                .chars()
                .filter(|&c| !is_report_whitespace(c))
                .collect::<String>(),
        )
    } else {
        PathBuf::from(cleaned.trim_matches(is_report_whitespace))
    }
}
