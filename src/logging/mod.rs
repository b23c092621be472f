//! Logging collaborator
//!
//! Workflow code never prints directly. It receives a [Logger] and reports
//! each step as a message, a short status tag (usually an emoji) and an
//! optional reason. The level and style are fixed when the logger is built.
//!
//! - `terminal` - coloured console output
//! - `memory` - captures entries for assertions in tests

pub mod memory;
pub mod terminal;

pub use self::terminal::ConsoleLogger;
pub use self::memory::{LogEntry, MemoryLogger};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GuardedPushError;

/// Status tag for a step that completed
pub const STATUS_OK: &str = "✅";
/// Status tag for a step that failed
pub const STATUS_FAILED: &str = "❌";
/// Status tag for a tolerated problem
pub const STATUS_WARNING: &str = "⚠️";
/// Status tag for a skipped item
pub const STATUS_SKIPPED: &str = "⏭️";

/// Severity of a log entry, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = GuardedPushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            other => Err(GuardedPushError::config(format!(
                "Unknown log level '{}'",
                other
            ))),
        }
    }
}

/// Line layout for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// `LEVEL message status`
    Default,
    /// Message padded with dots up to the status column, like pre-commit hooks
    #[default]
    PreCommit,
}

impl FromStr for Style {
    type Err = GuardedPushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Style::Default),
            "pre-commit" | "precommit" => Ok(Style::PreCommit),
            other => Err(GuardedPushError::config(format!(
                "Unknown log style '{}'",
                other
            ))),
        }
    }
}

/// Sink for workflow log entries
pub trait Logger {
    /// Record one entry
    fn log(&self, level: Level, message: &str, status: Option<&str>, reason: Option<&str>);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message, None, None);
    }

    fn info(&self, message: &str, status: &str) {
        self.log(Level::Info, message, Some(status), None);
    }

    fn warning(&self, message: &str, status: &str) {
        self.log(Level::Warning, message, Some(status), None);
    }

    fn error(&self, message: &str, status: &str) {
        self.log(Level::Error, message, Some(status), None);
    }

    fn error_with_reason(&self, message: &str, status: &str, reason: &str) {
        self.log(Level::Error, message, Some(status), Some(reason));
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: Level, message: &str, status: Option<&str>, reason: Option<&str>) {
        (**self).log(level, message, status, reason);
    }
}
