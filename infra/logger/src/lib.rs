//! Process-wide `tracing` setup for candor binaries.
//!
//! Console output defaults to `stderr`, which leaves `stdout` to the command results. A
//! directory can be added to get a rolling file next to (or instead of) the console, in
//! plain text or JSON lines. Filtering starts from a base level, then applies
//! [`LoggerBuilder::env_filter`] directives (e.g. `"candor_cache=debug"`) and `RUST_LOG`.
//!
//! ```rust
//! use candor_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("candor")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! tracing::debug!(subjects = 0, "starting");
//! ```

mod builder;
mod error;
mod layers;

pub use crate::builder::{LoggerBuilder, NoFile, NoName, WithFile, WithName};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use tracing_appender::non_blocking::WorkerGuard;

/// Stream that receives console output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Keeps the file writer alive. Dropping it flushes buffered file output through the
/// [`WorkerGuard`].
#[must_use = "dropping the handle stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a builder. The `name` given next prefixes rolling files,
    /// e.g. `candor.2026-10-14.log`.
    #[must_use = "nothing is installed until .init() is called"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// File writer guard; `None` for console-only setups.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

/// Parses `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"` or `"off"`, ignoring case and
/// surrounding whitespace.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for anything else.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse::<LevelFilter>().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("unknown log level '{level}'").into(),
        context: None,
    })
}
