//! Deletion planning and execution.
//!
//! # Overview
//!
//! For every finalized group the keeper (first member) is left alone and the
//! remaining members are visited last-seen first. Each candidate either:
//! - is removed (or would be, in dry-run mode), adding its size to the freed total
//! - fails with a [`DeleteError`], which is logged and recorded but never stops the run
//!
//! Groups and candidates are processed one at a time in a fixed order, so the
//! totals are deterministic for a given report.
//!
//! # Example
//!
//! ```no_run
//! use synodupe::actions::delete::{DeleteMode, FsRemover};
//! use synodupe::actions::plan::{execute_plan, PlanOptions};
//! use synodupe::duplicates::DuplicateGroup;
//! use synodupe::report::DuplicateRecord;
//!
//! let mut group = DuplicateGroup::new(DuplicateRecord::new(1, "/a", "10", 1));
//! group.push(DuplicateRecord::new(1, "/b", "10", 2));
//!
//! let options = PlanOptions { dry_run: true, ..PlanOptions::default() };
//! let report = execute_plan(&[group], &FsRemover::new(DeleteMode::Permanent), &options);
//! assert_eq!(report.files_removed, 1);
//! ```

use std::path::PathBuf;

use serde::Serialize;

use super::delete::{DeleteError, Remover};
use crate::duplicates::DuplicateGroup;
use crate::logging::PROGRESS_TARGET;
use crate::report::{sanitize_path, DuplicateRecord};

/// Options for executing a deletion plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    /// Skip the remover but account as if every delete succeeded.
    pub dry_run: bool,
    /// Remove embedded whitespace from paths, not just the ends.
    pub strip_path_whitespace: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            strip_path_whitespace: true,
        }
    }
}

/// What happened to one deletion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    /// Deleted from the filesystem.
    Removed,
    /// Would have been deleted; dry-run mode.
    DryRun,
    /// Nothing existed at the path.
    NotFound,
    /// The path was a directory with entries.
    DirectoryNotEmpty,
    /// Any other failure.
    Failed,
}

impl CandidateStatus {
    /// Whether this candidate counts toward removed files and freed bytes.
    #[must_use]
    pub fn is_removal(self) -> bool {
        matches!(self, Self::Removed | Self::DryRun)
    }

    fn from_error(error: &DeleteError) -> Self {
        match error {
            DeleteError::NotFound(_) => Self::NotFound,
            DeleteError::DirectoryNotEmpty(_) => Self::DirectoryNotEmpty,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateStatus::Removed => write!(f, "removed"),
            CandidateStatus::DryRun => write!(f, "dry_run"),
            CandidateStatus::NotFound => write!(f, "not_found"),
            CandidateStatus::DirectoryNotEmpty => write!(f, "directory_not_empty"),
            CandidateStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome for one deletion candidate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateOutcome {
    /// Path handed to the remover.
    pub path: PathBuf,
    /// Size counted toward the freed total (0 for failures or malformed sizes).
    pub bytes: u64,
    /// What happened.
    pub status: CandidateStatus,
    /// Failure message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-group outcome of the executor.
#[derive(Debug, Clone, Serialize)]
pub struct GroupOutcome {
    /// Group id from the report.
    pub group_id: i64,
    /// Members in the group, keeper included.
    pub members: usize,
    /// Path of the member that was kept.
    pub keeper: String,
    /// Candidates removed (or would-be removed).
    pub removed: usize,
    /// Bytes freed by those removals.
    pub bytes_freed: u64,
    /// Candidates whose size column could not be parsed.
    pub malformed_sizes: usize,
    /// One entry per candidate, in visiting order.
    pub candidates: Vec<CandidateOutcome>,
}

impl GroupOutcome {
    /// Candidates that could not be removed.
    pub fn failures(&self) -> impl Iterator<Item = &CandidateOutcome> {
        self.candidates.iter().filter(|c| !c.status.is_removal())
    }

    /// Number of candidates that could not be removed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Totals over a whole plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionReport {
    /// Per-group outcomes, in execution order.
    pub groups: Vec<GroupOutcome>,
    /// Files removed (or would-be removed).
    pub files_removed: usize,
    /// Bytes freed (or would-be freed).
    pub bytes_freed: u64,
    /// Candidates that failed.
    pub failures: usize,
    /// Candidates whose size column could not be parsed.
    pub malformed_sizes: usize,
}

impl DeletionReport {
    /// Check if every candidate was removed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures == 0
    }
}

/// Execute the plan for every group, in order.
pub fn execute_plan<D: Remover + ?Sized>(
    groups: &[DuplicateGroup],
    remover: &D,
    options: &PlanOptions,
) -> DeletionReport {
    let mut report = DeletionReport::default();

    for group in groups {
        let outcome = execute_group(group, remover, options);
        report.files_removed += outcome.removed;
        report.bytes_freed = report.bytes_freed.saturating_add(outcome.bytes_freed);
        report.failures += outcome.failure_count();
        report.malformed_sizes += outcome.malformed_sizes;
        report.groups.push(outcome);
    }

    log::info!(
        "Removed {} file(s), {} failed, freed {} bytes",
        report.files_removed,
        report.failures,
        report.bytes_freed
    );
    report
}

/// Execute the plan for one group. The keeper is never handed to `remover`.
pub fn execute_group<D: Remover + ?Sized>(
    group: &DuplicateGroup,
    remover: &D,
    options: &PlanOptions,
) -> GroupOutcome {
    log::info!(
        target: PROGRESS_TARGET,
        "Visiting duplicate group {} - {} member(s)",
        group.group_id(),
        group.len()
    );

    let mut outcome = GroupOutcome {
        group_id: group.group_id(),
        members: group.len(),
        keeper: group.keeper().path().to_string(),
        removed: 0,
        bytes_freed: 0,
        malformed_sizes: 0,
        candidates: Vec::with_capacity(group.len() - 1),
    };

    for record in group.candidates() {
        let path = sanitize_path(record.path(), options.strip_path_whitespace);
        log::info!(
            target: PROGRESS_TARGET,
            "    Group {}: removing duplicate file {}",
            group.group_id(),
            path.display()
        );

        let result = if options.dry_run {
            Ok(())
        } else {
            remover.remove(&path)
        };

        let candidate = match result {
            Ok(()) => {
                let bytes = accounted_size(record, &mut outcome.malformed_sizes);
                outcome.removed += 1;
                outcome.bytes_freed = outcome.bytes_freed.saturating_add(bytes);
                CandidateOutcome {
                    path,
                    bytes,
                    status: if options.dry_run {
                        CandidateStatus::DryRun
                    } else {
                        CandidateStatus::Removed
                    },
                    error: None,
                }
            }
            Err(err) => {
                log::error!("    Group {}: {}", group.group_id(), err);
                CandidateOutcome {
                    path,
                    bytes: 0,
                    status: CandidateStatus::from_error(&err),
                    error: Some(err.to_string()),
                }
            }
        };
        outcome.candidates.push(candidate);
    }

    outcome
}

/// Size to add to the freed total; malformed sizes count as zero.
fn accounted_size(record: &DuplicateRecord, malformed: &mut usize) -> u64 {
    match record.size_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("{}; counting 0 bytes freed", err);
            *malformed += 1;
            0
        }
    }
}
