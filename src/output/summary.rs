//! End-of-run summary.
//!
//! Pure aggregation over the grouping pass and the deletion report. Rendered
//! once, after every group has been processed.

use std::fmt::Write as _;
use std::time::Duration;

use bytesize::ByteSize;
use serde::Serialize;
use yansi::Paint;

use crate::actions::DeletionReport;
use crate::duplicates::GroupedReport;

/// Bytes per gibibyte.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Aggregate figures for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Physical lines read, blank ones included.
    pub raw_lines: usize,
    /// Non-blank lines visited, header included.
    pub lines_visited: usize,
    /// Data rows accepted into groups.
    pub content_rows: usize,
    /// Rows skipped as malformed.
    pub skipped_rows: usize,
    /// Groups handed to the executor.
    pub groups: usize,
    /// Distinct group ids encountered.
    pub distinct_group_ids: usize,
    /// Files removed (or would-be removed in dry-run mode).
    pub files_removed: usize,
    /// Bytes freed (or would-be freed).
    pub bytes_freed: u64,
    /// Candidates that could not be removed.
    pub failures: usize,
    /// Candidates whose size could not be parsed.
    pub malformed_sizes: usize,
    /// Whether deletions were simulated.
    pub dry_run: bool,
    /// Wall-clock time in whole seconds.
    pub elapsed_secs: u64,
}

impl RunSummary {
    /// Aggregate the results of both passes.
    #[must_use]
    pub fn new(
        grouped: &GroupedReport,
        deletion: &DeletionReport,
        dry_run: bool,
        elapsed: Duration,
    ) -> Self {
        Self {
            raw_lines: grouped.cursor.raw_line,
            lines_visited: grouped.lines_visited,
            content_rows: grouped.records,
            skipped_rows: grouped.skipped_rows,
            groups: grouped.groups.len(),
            distinct_group_ids: grouped.distinct_ids,
            files_removed: deletion.files_removed,
            bytes_freed: deletion.bytes_freed,
            failures: deletion.failures,
            malformed_sizes: deletion.malformed_sizes,
            dry_run,
            elapsed_secs: elapsed.as_secs(),
        }
    }

    /// Freed space in whole gibibytes (integer division).
    #[must_use]
    pub fn gib_freed(&self) -> u64 {
        self.bytes_freed / GIB
    }

    /// Visited content lines that remain after removal.
    ///
    /// Rows skipped as malformed still name files on disk and are counted.
    #[must_use]
    pub fn files_remaining(&self) -> usize {
        (self.content_rows + self.skipped_rows).saturating_sub(self.files_removed)
    }

    /// Freed space as a human-readable string.
    #[must_use]
    pub fn freed_display(&self) -> String {
        ByteSize::b(self.bytes_freed).to_string()
    }

    /// Plain-text summary block.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let title = if self.dry_run {
            "Summary (dry run, nothing deleted)"
        } else {
            "Summary"
        };
        let _ = writeln!(out, "\n{}\n", title.bold());
        let _ = writeln!(out, "Visited lines: {}", self.lines_visited);
        let _ = writeln!(out, "Content rows: {}", self.content_rows);
        let _ = writeln!(
            out,
            "Group count (duplicate id): {}",
            self.distinct_group_ids
        );
        let _ = writeln!(
            out,
            "Removed files: {} freed up space: {} G ({})",
            self.files_removed,
            self.gib_freed(),
            self.freed_display()
        );
        let _ = writeln!(out, "Files remaining: {}", self.files_remaining());
        if self.failures > 0 {
            let _ = writeln!(out, "{}", format!("Failures: {}", self.failures).red());
        }
        if self.skipped_rows > 0 {
            let _ = writeln!(
                out,
                "{}",
                format!("Skipped rows: {}", self.skipped_rows).yellow()
            );
        }
        if self.malformed_sizes > 0 {
            let _ = writeln!(
                out,
                "{}",
                format!("Malformed sizes: {}", self.malformed_sizes).yellow()
            );
        }
        let _ = writeln!(out, "Time taken: {} s", self.elapsed_secs);
        out
    }
}
