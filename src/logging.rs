use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Where log lines may go for the current front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The terminal is free; log to stderr unless a file is configured.
    Stderr,
    /// The terminal belongs to the UI; log only when a file is configured.
    FileOnly,
}

/// Install the global subscriber. Returns false when logging stays off.
pub fn init(config: &Config, target: LogTarget) -> Result<bool> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .compact()
                .init();
        }
        (None, LogTarget::Stderr) => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
        (None, LogTarget::FileOnly) => return Ok(false),
    }
    Ok(true)
}
