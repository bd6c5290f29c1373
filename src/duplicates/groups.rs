//! Contiguous-run grouping of report records.
//!
//! # Overview
//!
//! Scanners list every copy of a logical file on consecutive rows sharing a
//! group id. [`GroupBuilder`] walks the records in file order and closes the
//! current group as soon as a different id appears, so memory holds only
//! finished groups plus one open buffer.
//!
//! The first record of each group is its keeper.
//!
//! # Example
//!
//! ```
//! use synodupe::duplicates::{GroupBuilder, SplitGroupPolicy};
//! use synodupe::report::DuplicateRecord;
//!
//! let mut builder = GroupBuilder::new(SplitGroupPolicy::Abort);
//! builder.push(DuplicateRecord::new(1, "/a", "100", 1)).unwrap();
//! builder.push(DuplicateRecord::new(1, "/b", "100", 2)).unwrap();
//! builder.push(DuplicateRecord::new(2, "/c", "50", 3)).unwrap();
//!
//! let grouped = builder.finish();
//! assert_eq!(grouped.groups.len(), 2);
//! assert_eq!(grouped.groups[0].keeper().path(), "/a");
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::logging::PROGRESS_TARGET;
use crate::report::{DuplicateRecord, ParseCursor, ReportError, ReportReader, RowPolicy};

/// What to do when a group id reappears after its run of rows has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitGroupPolicy {
    /// Fail with [`ReportError::SplitGroup`].
    #[default]
    Abort,
    /// Treat the new run as the group and drop the earlier one.
    Replace,
}

/// Ordered copies of one logical file.
///
/// Never empty; every member carries the same group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    group_id: i64,
    members: Vec<DuplicateRecord>,
}

impl DuplicateGroup {
    /// Open a group seeded with its keeper.
    #[must_use]
    pub fn new(keeper: DuplicateRecord) -> Self {
        Self {
            group_id: keeper.group_id(),
            members: vec![keeper],
        }
    }

    /// Append a copy in encounter order.
    pub fn push(&mut self, record: DuplicateRecord) {
        debug_assert_eq!(
            record.group_id(),
            self.group_id,
            "Record group {} doesn't match group {}",
            record.group_id(),
            self.group_id
        );
        self.members.push(record);
    }

    /// Group id shared by all members.
    #[must_use]
    pub fn group_id(&self) -> i64 {
        self.group_id
    }

    /// Number of members, keeper included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; kept alongside `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member that is never deleted.
    #[must_use]
    pub fn keeper(&self) -> &DuplicateRecord {
        &self.members[0]
    }

    /// All members in encounter order.
    #[must_use]
    pub fn members(&self) -> &[DuplicateRecord] {
        &self.members
    }

    /// Deletion candidates: every member but the keeper, last-seen first.
    pub fn candidates(&self) -> impl Iterator<Item = &DuplicateRecord> {
        self.members[1..].iter().rev()
    }
}

/// Result of the grouping pass.
#[derive(Debug, Clone, Default)]
pub struct GroupedReport {
    /// Finalized groups, first-finalized first.
    pub groups: Vec<DuplicateGroup>,
    /// Number of distinct group ids seen.
    pub distinct_ids: usize,
    /// Data rows accepted into groups.
    pub records: usize,
    /// Non-blank lines read, header included.
    pub lines_visited: usize,
    /// Earlier groups dropped under [`SplitGroupPolicy::Replace`].
    pub replaced: usize,
    /// Rows left out under [`RowPolicy::Skip`].
    pub skipped_rows: usize,
    /// Reader position at end of input.
    pub cursor: ParseCursor,
}

impl GroupedReport {
    /// Total number of deletion candidates across all groups.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(|g| g.len() - 1).sum()
    }
}

/// Builds groups from records arriving in file order.
#[derive(Debug)]
pub struct GroupBuilder {
    policy: SplitGroupPolicy,
    current: Option<DuplicateGroup>,
    finalized: Vec<DuplicateGroup>,
    slots: HashMap<i64, usize>,
    records: usize,
    replaced: usize,
}

impl GroupBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new(policy: SplitGroupPolicy) -> Self {
        Self {
            policy,
            current: None,
            finalized: Vec::new(),
            slots: HashMap::new(),
            records: 0,
            replaced: 0,
        }
    }

    /// Id of the group currently being filled.
    #[must_use]
    pub fn current_group_id(&self) -> Option<i64> {
        self.current.as_ref().map(DuplicateGroup::group_id)
    }

    /// Add the next record.
    ///
    /// # Errors
    ///
    /// Returns `SplitGroup` when the record reopens an already finalized group
    /// and the policy is [`SplitGroupPolicy::Abort`].
    pub fn push(&mut self, record: DuplicateRecord) -> Result<(), ReportError> {
        if let Some(group) = self.current.as_mut() {
            if group.group_id() == record.group_id() {
                group.push(record);
                self.records += 1;
                return Ok(());
            }
        }

        if self.slots.contains_key(&record.group_id()) {
            match self.policy {
                SplitGroupPolicy::Abort => {
                    return Err(ReportError::SplitGroup {
                        group_id: record.group_id(),
                        line: record.line(),
                    });
                }
                SplitGroupPolicy::Replace => {
                    log::warn!(
                        "Group {} reappears at line {}; the earlier rows will be ignored",
                        record.group_id(),
                        record.line()
                    );
                }
            }
        }

        if let Some(done) = self.current.take() {
            self.finalize(done);
        }
        self.current = Some(DuplicateGroup::new(record));
        self.records += 1;
        Ok(())
    }

    fn finalize(&mut self, group: DuplicateGroup) {
        log::debug!(
            "Closed group {} with {} member(s)",
            group.group_id(),
            group.len()
        );
        match self.slots.get(&group.group_id()) {
            Some(&slot) => {
                self.finalized[slot] = group;
                self.replaced += 1;
            }
            None => {
                self.slots.insert(group.group_id(), self.finalized.len());
                self.finalized.push(group);
            }
        }
    }

    /// Close the open group and return everything built so far.
    #[must_use]
    pub fn finish(mut self) -> GroupedReport {
        if let Some(done) = self.current.take() {
            self.finalize(done);
        }
        GroupedReport {
            distinct_ids: self.slots.len(),
            groups: self.finalized,
            records: self.records,
            lines_visited: 0,
            replaced: self.replaced,
            skipped_rows: 0,
            cursor: ParseCursor::default(),
        }
    }
}

/// Options for the read-and-group pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupingOptions {
    /// Handling of unparseable rows.
    pub malformed_rows: RowPolicy,
    /// Handling of non-contiguous group ids.
    pub split_groups: SplitGroupPolicy,
}

/// Read a whole report and group its rows.
///
/// The header line is skipped. Each accepted row is logged with its content
/// line number and group id. The reader, and with it the report handle, is
/// consumed and dropped before this function returns.
///
/// # Errors
///
/// - `Io` if reading fails part way
/// - `MalformedRow` for an unparseable row under [`RowPolicy::Abort`]
/// - `SplitGroup` for a reopened group under [`SplitGroupPolicy::Abort`]
pub fn group_report<R: BufRead>(
    mut reader: ReportReader<R>,
    options: &GroupingOptions,
) -> Result<GroupedReport, ReportError> {
    let mut builder = GroupBuilder::new(options.split_groups);
    let mut skipped_rows = 0;
    let mut lines_visited = 0;

    for line in reader.by_ref() {
        let line = line?;
        lines_visited += 1;
        if line.is_header() {
            log::debug!("Skipping header: {}", line.text.trim_end());
            continue;
        }

        let content_line = line.cursor.content_line;
        let record = match DuplicateRecord::parse(&line.text, content_line) {
            Ok(record) => record,
            Err(err) => match options.malformed_rows {
                RowPolicy::Abort => return Err(err),
                RowPolicy::Skip => {
                    log::warn!("Skipping row: {}", err);
                    skipped_rows += 1;
                    continue;
                }
            },
        };

        log::info!(
            target: PROGRESS_TARGET,
            "Line {}    Managing group: {}    Adding: {}",
            content_line,
            record.group_id(),
            record.path()
        );
        builder.push(record)?;
    }

    let mut grouped = builder.finish();
    grouped.skipped_rows = skipped_rows;
    grouped.lines_visited = lines_visited;
    grouped.cursor = reader.cursor();
    log::info!(
        "Grouped {} row(s) into {} group(s)",
        grouped.records,
        grouped.groups.len()
    );
    Ok(grouped)
}
