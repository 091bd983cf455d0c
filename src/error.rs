//! Error types for pomo.
//!
//! Only [`ConfigError`] is fatal. [`SinkError`] is raised by renderers and
//! notifiers and is always absorbed by the session loop.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    /// Normal quit
    pub const SUCCESS: u8 = 0;

    /// Terminal or I/O failure outside the timer loop
    pub const ERROR: u8 = 1;

    /// Invalid configuration, reported before any timer starts
    pub const CONFIG_ERROR: u8 = 2;
}

/// Top-level error returned by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Acquiring or releasing terminal modes failed
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl AppError {
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Terminal(_) => ExitCode::ERROR,
        }
    }
}

/// Configuration validation or loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A phase duration is zero, negative or not a number
    #[error("invalid {field} duration: {minutes} minutes (must be a positive number)")]
    InvalidDuration { field: &'static str, minutes: f64 },

    #[error("invalid cycle count: {0} (must be at least 1)")]
    InvalidCycles(u32),

    #[error("invalid acceleration factor: {0} (must be a finite number >= 1)")]
    InvalidAcceleration(f64),

    #[error("invalid tick interval: {0} ms (must be greater than 0)")]
    InvalidTickInterval(u64),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure inside a render or notify sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render failed: {0}")]
    Render(#[from] std::io::Error),

    #[error("notification failed: {0}")]
    Notify(String),
}
