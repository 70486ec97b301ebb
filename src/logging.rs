//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the default filter in every mode.

use anyhow::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn";

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Standard error, for line-oriented commands
    Stderr,
    /// Append to a file
    File(&'a Path),
    /// Drop everything, for the full-screen TUI without a log file
    Discard,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
///
/// A second call is a no-op.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init_logging(target: LogTarget<'_>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter());

    // Ignore the error from a subscriber that is already installed
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
        }
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };
    Ok(())
}
