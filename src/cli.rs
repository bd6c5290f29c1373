//! Command-line interface definitions for synodupe.
//!
//! This module defines all CLI arguments using the clap derive API. There is a
//! single operation: read a duplicate report and remove every copy but the
//! first of each group.
//!
//! # Example
//!
//! ```bash
//! # Preview what would be removed
//! synodupe --report duplicate_file.csv --dry-run
//!
//! # Remove duplicates, moving them to the trash instead of unlinking
//! synodupe --report duplicate_file.csv --trash
//!
//! # JSON summary plus a per-file outcome log
//! synodupe -f duplicate_file.csv --output json --outcomes-csv outcomes.csv
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Remove duplicate files listed in a NAS duplicate-file report.
///
/// Reads the tab-separated report exported by the NAS storage analyzer,
/// keeps the first listed copy of every duplicate group and deletes the rest.
#[derive(Debug, Parser)]
#[command(name = "synodupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Duplicate report exported by the NAS (tab-separated)
    #[arg(short = 'f', long = "report", visible_alias = "csv-file", value_name = "PATH")]
    pub report: PathBuf,

    /// Plan and account for every deletion without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Move removed copies to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Skip unparseable rows with a warning instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,

    /// Let a reappearing group id replace its earlier rows instead of aborting
    #[arg(long)]
    pub replace_split_groups: bool,

    /// Keep whitespace inside paths (only trim the ends)
    #[arg(long)]
    pub keep_path_spaces: bool,

    /// Exit with a non-zero status if any copy could not be removed
    #[arg(long)]
    pub strict: bool,

    /// Summary format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write one CSV row per deletion candidate to this file
    #[arg(long, value_name = "PATH")]
    pub outcomes_csv: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary block
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
