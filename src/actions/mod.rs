//! File actions module.
//!
//! This module provides functionality for:
//! - Removing single paths, permanently or via the system trash
//! - Executing a deletion plan over finalized duplicate groups
//!
//! # Deletion
//!
//! The delete module owns every filesystem mutation and reports failures as
//! [`DeleteError`] values instead of panicking or aborting.
//!
//! ```no_run
//! use synodupe::actions::delete::permanent_delete;
//! use std::path::Path;
//!
//! let result = permanent_delete(Path::new("/path/to/duplicate.txt"));
//! ```
//!
//! # Planning
//!
//! The plan module walks the groups, keeps the first member of each and
//! removes the rest, accumulating removed-file and freed-byte totals.

pub mod delete;
pub mod plan;

// Re-export commonly used types
pub use delete::{
    delete_to_trash, permanent_delete, DeleteError, DeleteMode, FsRemover, Remover,
};
pub use plan::{
    execute_group, execute_plan, CandidateOutcome, CandidateStatus, DeletionReport, GroupOutcome,
    PlanOptions,
};
