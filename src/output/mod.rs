//! Output formatters for run results.
//!
//! This module provides different renderings of a finished run:
//! - Plain-text summary block for the console
//! - JSON for automation and scripting
//! - CSV export of per-candidate outcomes

pub mod csv;
pub mod json;
pub mod summary;

// Re-export main types
pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::summary::RunSummary;
