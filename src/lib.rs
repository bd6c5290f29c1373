//! synodupe - Duplicate report cleaner for NAS storage-analyzer exports
//!
//! Reads the tab-separated duplicate-file report produced by the NAS storage
//! analyzer, groups its rows by duplicate id, keeps the first listed copy of
//! every group and removes the others (or only accounts for them in dry-run).

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod report;

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::actions::{execute_plan, FsRemover};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::group_report;
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, RunSummary};
use crate::report::ReportReader;

/// Run one cleanup pass as described by the parsed command line.
///
/// Logging must already be initialised by the caller.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the report cannot be
/// read, a row is malformed under the abort policy, a group id is split under
/// the abort policy, or an output file cannot be written. Per-file deletion failures are not errors.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    if config.dry_run {
        log::info!("Dry run: no files will be deleted");
    }
    log::info!("Reading report {}", cli.report.display());

    let start = Instant::now();

    let reader = ReportReader::open(&cli.report).context("Failed to open duplicate report")?;
    let grouped = group_report(reader, &config.grouping_options())
        .context("Failed to group duplicate report")?;

    let remover = FsRemover::new(config.delete_mode);
    let deletion = execute_plan(&grouped.groups, &remover, &config.plan_options());

    let summary = RunSummary::new(&grouped, &deletion, config.dry_run, start.elapsed());

    if let Some(path) = &cli.outcomes_csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create outcomes file {}", path.display()))?;
        CsvOutput::new(&deletion.groups)
            .write_to(BufWriter::new(file))
            .with_context(|| format!("Failed to write outcomes file {}", path.display()))?;
        log::info!("Wrote outcomes to {}", path.display());
    }

    let exit_code = if config.strict && !deletion.all_succeeded() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match config.output {
        OutputFormat::Text => {
            handle
                .write_all(summary.render_text().as_bytes())
                .context("Failed to write summary")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&deletion.groups, &summary, exit_code)
                .write_to(&mut handle)
                .context("Failed to write JSON summary")?;
        }
    }
    handle.flush().context("Failed to flush stdout")?;

    Ok(exit_code)
}
