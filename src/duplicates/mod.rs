//! Duplicate group module.
//!
//! This module provides functionality for:
//! - Building groups from contiguous report rows
//! - Keeper and deletion-candidate selection within a group

pub mod groups;

pub use groups::{
    group_report, DuplicateGroup, GroupBuilder, GroupedReport, GroupingOptions, SplitGroupPolicy,
};
