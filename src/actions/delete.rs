//! Single-path removal.
//!
//! # Overview
//!
//! This module is the only place that touches the filesystem on behalf of a
//! deletion plan:
//! - Permanent deletion of files, symlinks and empty directories (default)
//! - Move to system trash (opt-in, recoverable)
//!
//! Every failure is returned as a [`DeleteError`] so callers can decide what
//! counts as fatal. The planner treats all of them as per-file failures.
//!
//! # Example
//!
//! ```no_run
//! use synodupe::actions::delete::{DeleteMode, FsRemover, Remover};
//! use std::path::Path;
//!
//! let remover = FsRemover::new(DeleteMode::Permanent);
//! match remover.remove(Path::new("/volume1/photos/copy.jpg")) {
//!     Ok(()) => println!("removed"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Nothing exists at the path (already deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The path is a directory that still has entries.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Path the failed operation targeted.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::DirectoryNotEmpty(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// How removed copies are disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink permanently.
    #[default]
    Permanent,
    /// Move to the platform trash.
    Trash,
}

/// Removes one path from the filesystem.
pub trait Remover {
    /// Remove `path`, which may be a file, a symlink or an empty directory.
    ///
    /// # Errors
    ///
    /// Returns a [`DeleteError`] describing why the path is still there.
    fn remove(&self, path: &Path) -> Result<(), DeleteError>;
}

/// [`Remover`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover {
    mode: DeleteMode,
}

impl FsRemover {
    /// Create a remover using `mode`.
    #[must_use]
    pub fn new(mode: DeleteMode) -> Self {
        Self { mode }
    }

    /// Configured delete mode.
    #[must_use]
    pub fn mode(&self) -> DeleteMode {
        self.mode
    }
}

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> Result<(), DeleteError> {
        match self.mode {
            DeleteMode::Permanent => permanent_delete(path),
            DeleteMode::Trash => delete_to_trash(path),
        }
    }
}

/// Permanently delete a file, symlink or empty directory.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if nothing exists at `path`
/// - `DirectoryNotEmpty` if `path` is a directory with entries
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for anything else
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    let result = if metadata.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| DeleteError::from_io(path, e))?;

    log::debug!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Move a file, symlink or empty directory to the system trash.
///
/// Non-empty directories are refused so both modes agree on what may be
/// removed.
///
/// # Errors
///
/// - `NotFound` if nothing exists at `path`
/// - `DirectoryNotEmpty` if `path` is a directory with entries
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    if metadata.is_dir() {
        let mut entries = fs::read_dir(path).map_err(|e| DeleteError::from_io(path, e))?;
        if entries.next().is_some() {
            return Err(DeleteError::DirectoryNotEmpty(path.to_path_buf()));
        }
    }

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::debug!("Moved to trash: {}", path.display());
    Ok(())
}
