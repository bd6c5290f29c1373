//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config directory)
//! 3. `SYNODUPE_*` environment variables (e.g. `SYNODUPE_DELETE_MODE=trash`)
//! 4. Command-line flags
//!
//! # Example file
//!
//! ```toml
//! dry_run = false
//! delete_mode = "trash"
//! malformed_rows = "skip"
//! split_groups = "abort"
//! strip_path_whitespace = true
//! strict = false
//! output = "text"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::{DeleteMode, PlanOptions};
use crate::cli::{Cli, OutputFormat};
use crate::duplicates::{GroupingOptions, SplitGroupPolicy};
use crate::report::RowPolicy;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SYNODUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account for deletions without performing them.
    pub dry_run: bool,
    /// How duplicate copies are removed.
    pub delete_mode: DeleteMode,
    /// What to do with rows missing a required field.
    pub malformed_rows: RowPolicy,
    /// What to do when a group id reappears after another group.
    pub split_groups: SplitGroupPolicy,
    /// Remove every whitespace character from paths before deleting.
    pub strip_path_whitespace: bool,
    /// Treat per-file deletion failures as a partial failure exit.
    pub strict: bool,
    /// Summary format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            delete_mode: DeleteMode::Permanent,
            malformed_rows: RowPolicy::Abort,
            split_groups: SplitGroupPolicy::Abort,
            strip_path_whitespace: true,
            strict: false,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// A missing file contributes nothing; environment overrides still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment override holds an
    /// invalid value. Invalid layers are never replaced by defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from_path(&path),
            Err(e) => {
                log::debug!("No config directory, using defaults: {}", e);
                Ok(Figment::from(Serialized::defaults(Config::default()))
                    .merge(Env::prefixed(ENV_PREFIX))
                    .extract()?)
            }
        }
    }

    /// Load the configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file if any layer holds an invalid value.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
        }
        Self::figment(path)
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Build the layered provider stack for a given config file.
    ///
    /// A missing file contributes nothing.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "synodupe", "synodupe")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded configuration.
    ///
    /// Boolean flags only ever switch a behaviour on.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if cli.dry_run {
            self.dry_run = true;
        }
        if cli.trash {
            self.delete_mode = DeleteMode::Trash;
        }
        if cli.skip_malformed {
            self.malformed_rows = RowPolicy::Skip;
        }
        if cli.replace_split_groups {
            self.split_groups = SplitGroupPolicy::Replace;
        }
        if cli.keep_path_spaces {
            self.strip_path_whitespace = false;
        }
        if cli.strict {
            self.strict = true;
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
    }

    /// Options for the grouping pass.
    #[must_use]
    pub fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions {
            malformed_rows: self.malformed_rows,
            split_groups: self.split_groups,
        }
    }

    /// Options for the deletion pass.
    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            dry_run: self.dry_run,
            strip_path_whitespace: self.strip_path_whitespace,
        }
    }
}
