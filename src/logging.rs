//! Logging initialization.
//!
//! The terminal belongs to the timer view, so log output goes to a file.
//! `POMO_LOG` takes precedence over the `-v` verbosity mapping.

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POMO_LOG";

/// Maps a verbosity level to a tracing directive string.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber writing to `path` (appending).
///
/// Uses `try_init()`, so calling this more than once is harmless.
pub fn init_logging(path: &Path, verbosity: u8) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbosity >= 2)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
