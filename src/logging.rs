//! Logging infrastructure for synodupe.
//!
//! Two streams share the `log` facade and the `env_logger` backend:
//!
//! - **Progress** (target [`PROGRESS_TARGET`]): one line per content row, per
//!   visited group and per deletion attempt. Printed bare, without a level
//!   prefix, so a run reads like a transcript of what was done.
//! - **Diagnostics** (every other target): warnings about skipped rows or
//!   malformed sizes, per-file failures, debug detail. Printed with a level
//!   prefix, plus the module when verbose.
//!
//! Both go to stderr; the final summary goes to stdout.
//!
//! # Level policy
//!
//! | Flags   | Diagnostics | Progress |
//! |---------|-------------|----------|
//! | `-q`    | error       | off      |
//! | (none)  | info        | info     |
//! | `-v`    | debug       | info     |
//! | `-vv`   | trace       | trace    |
//!
//! `RUST_LOG` directives are applied on top of this table, so
//! `RUST_LOG=synodupe::progress=off` keeps diagnostics but hides progress.

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Log target for per-row, per-group and per-deletion progress lines.
pub const PROGRESS_TARGET: &str = "synodupe::progress";

/// Crate prefix stripped from module paths in verbose output.
const CRATE_PREFIX: &str = "synodupe::";

/// Level filters derived from the command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter for diagnostic records.
    pub diagnostics: LevelFilter,
    /// Filter for progress records.
    pub progress: LevelFilter,
    /// Show the emitting module next to diagnostics.
    pub show_module: bool,
}

impl LogSettings {
    /// Settings for `-v` count and `-q`. Quiet wins over verbose.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self {
                diagnostics: LevelFilter::Error,
                progress: LevelFilter::Off,
                show_module: false,
            };
        }
        match verbose {
            0 => Self {
                diagnostics: LevelFilter::Info,
                progress: LevelFilter::Info,
                show_module: false,
            },
            1 => Self {
                diagnostics: LevelFilter::Debug,
                progress: LevelFilter::Info,
                show_module: true,
            },
            _ => Self {
                diagnostics: LevelFilter::Trace,
                progress: LevelFilter::Trace,
                show_module: true,
            },
        }
    }
}

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// # Panics
///
/// Panics if called more than once, as `env_logger` can only be initialized
/// once per process.
///
/// # Example
///
/// ```rust,no_run
/// use synodupe::logging::{init_logging, PROGRESS_TARGET};
///
/// init_logging(0, false);
///
/// log::info!(target: PROGRESS_TARGET, "Line 1    Managing group: 4    Adding: /a");
/// log::warn!("Skipping row");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) {
    let settings = LogSettings::from_flags(verbose, quiet);
    let rust_log = env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    builder
        .filter_level(settings.diagnostics)
        .filter_module(PROGRESS_TARGET, settings.progress);
    if let Some(directives) = &rust_log {
        builder.parse_filters(directives);
    }

    let show_module = settings.show_module;
    builder.format(move |buf, record| {
        if record.target() == PROGRESS_TARGET {
            return writeln!(buf, "{}", record.args());
        }

        let level = record.level();
        let style = buf.default_level_style(level);
        match module_label(record.module_path(), show_module) {
            Some(module) => writeln!(
                buf,
                "{style}{:<5}{style:#} [{}] {}",
                level,
                module,
                record.args()
            ),
            None => writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args()),
        }
    });

    builder.init();

    match rust_log {
        Some(directives) => log::debug!("Logging configured from RUST_LOG={:?}", directives),
        None => log::debug!("Logging configured: {:?}", settings),
    }
}

/// Module shown next to a diagnostic, without the crate prefix.
fn module_label(module_path: Option<&str>, show_module: bool) -> Option<&str> {
    if !show_module {
        return None;
    }
    let path = module_path?;
    Some(path.strip_prefix(CRATE_PREFIX).unwrap_or(path))
}
