//! JSON output formatter for run results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "summary": {
//!     "raw_lines": 7,
//!     "lines_visited": 6,
//!     "content_rows": 5,
//!     "groups": 2,
//!     "files_removed": 3,
//!     "bytes_freed": 560,
//!     "gib_freed": 0,
//!     "files_remaining": 2,
//!     "dry_run": false,
//!     "elapsed_secs": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "SD000"
//!   },
//!   "groups": [
//!     {
//!       "group_id": 1,
//!       "members": 3,
//!       "keeper": "/volume1/a.jpg",
//!       "removed": 2,
//!       "bytes_freed": 500,
//!       "candidates": [{ "path": "/volume1/c.jpg", "bytes": 300, "status": "removed" }]
//!     }
//!   ]
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::summary::RunSummary;
use crate::actions::GroupOutcome;
use crate::error::ExitCode;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Aggregate figures
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Freed space in whole gibibytes
    pub gib_freed: u64,
    /// Content rows left after removal
    pub files_remaining: usize,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a run summary and an exit code.
    #[must_use]
    pub fn from_run_summary(summary: &RunSummary, exit_code: ExitCode) -> Self {
        Self {
            summary: summary.clone(),
            gib_freed: summary.gib_freed(),
            files_remaining: summary.files_remaining(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Run summary statistics
    pub summary: JsonSummary,
    /// Per-group outcomes in execution order
    pub groups: &'a [GroupOutcome],
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output.
    #[must_use]
    pub fn new(groups: &'a [GroupOutcome], summary: &RunSummary, exit_code: ExitCode) -> Self {
        Self {
            summary: JsonSummary::from_run_summary(summary, exit_code),
            groups,
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
