//! File logging for the TUI
//!
//! The terminal belongs to ratatui, so records go to a daily-rolling file only.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "DEXBOOK_LOG";
pub const LOG_FILE: &str = "dexbook.log";

/// `<data_local_dir>/dexbook/logs`, or `./logs` when there is no data dir.
pub fn default_log_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|dir| dir.join("dexbook").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// records get flushed.
pub fn init(log_dir: &Path) -> WorkerGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create logs directory: {e}");
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter());

    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Logging already initialized: {e}");
    }

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    guard
}
