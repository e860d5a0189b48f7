// src/logging.rs
// Log setup for the caller. The terminal belongs to the UI, so log lines go to a file,
// one per event, stamped with the local time.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::error::{CallerError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock timestamps, e.g. `2025-06-01 20:15:03`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Builds the level filter. `RUST_LOG` wins over the configured level.
pub fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `log_file`, creating its directory if needed.
pub fn init_logging(log_file: &Path, level: &str) -> Result<()> {
    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_timer(LocalTimestamp)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| CallerError::Logging(e.to_string()))
}
