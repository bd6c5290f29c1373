//! Duplicate report ingestion.
//!
//! This module turns the tab-separated duplicate listing exported by a NAS
//! duplicate-file scanner into structured records:
//! - [`reader`]: lazy, single-byte decoded line source with blank-line skipping
//! - [`record`]: row parsing and field sanitization
//!
//! # Example
//!
//! ```no_run
//! use synodupe::report::{DuplicateRecord, ReportReader};
//! use std::path::Path;
//!
//! let reader = ReportReader::open(Path::new("duplicates.csv")).unwrap();
//! for line in reader {
//!     let line = line.unwrap();
//!     if line.is_header() {
//!         continue;
//!     }
//!     let record = DuplicateRecord::parse(&line.text, line.cursor.content_line).unwrap();
//!     println!("{} -> {}", record.group_id(), record.path());
//! }
//! ```

pub mod reader;
pub mod record;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reader::{ParseCursor, ReportLine, ReportReader};
pub use record::{is_report_whitespace, sanitize_field, sanitize_path, DuplicateRecord};

/// Errors raised while reading or interpreting a duplicate report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report path does not resolve to a readable file.
    #[error("report not found: {0}")]
    NotFound(PathBuf),

    /// The report could not be opened or read.
    #[error("I/O error reading report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A content row is missing required fields or has a non-integer group id.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// The size column of a row is not an integer.
    #[error("malformed size {value:?} for {path}")]
    MalformedSize { path: String, value: String },

    /// A group id showed up again after its run of rows had already ended.
    #[error("group {group_id} reappears at line {line} after its rows were closed")]
    SplitGroup { group_id: i64, line: usize },
}

impl ReportError {
    /// Build the error for a failed open, separating "missing" from other I/O failures.
    pub(crate) fn from_open(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source },
        }
    }
}

/// What to do with a content row that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Abort the whole run on the first malformed row.
    #[default]
    Abort,
    /// Log a warning and leave the row out of grouping.
    Skip,
}
