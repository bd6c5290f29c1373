//! CSV export of deletion outcomes.
//!
//! One row is generated for each deletion candidate, keepers excluded.
//!
//! # Columns
//!
//! - `group_id`: Group id from the report
//! - `path`: Path handed to the remover
//! - `bytes`: Bytes counted toward the freed total
//! - `status`: `removed`, `dry_run`, `not_found`, `directory_not_empty` or `failed`
//! - `error`: Failure message, empty on success

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::actions::GroupOutcome;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: i64,
    path: String,
    bytes: u64,
    status: String,
    error: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [GroupOutcome],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [GroupOutcome]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for group in self.groups {
            for candidate in &group.candidates {
                csv_writer.serialize(CsvRow {
                    group_id: group.group_id,
                    path: candidate.path.to_string_lossy().to_string(),
                    bytes: candidate.bytes,
                    status: candidate.status.to_string(),
                    error: candidate.error.as_deref().unwrap_or(""),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
