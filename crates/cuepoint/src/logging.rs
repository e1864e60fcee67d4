//! File logging.
//!
//! The terminal belongs to the UI, so log lines go to a file through a
//! non-blocking writer. Nothing is logged unless a file is configured.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Install the global subscriber. The returned guard must outlive the app.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(file: Option<&Path>, level: &str) -> Result<Option<WorkerGuard>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let (dir, name) = split_log_path(file)
        .ok_or_else(|| AppError::Logging(format!("not a file path: {}", file.display())))?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(Some(guard))
}

fn split_log_path(path: &Path) -> Option<(PathBuf, OsString)> {
    let name = path.file_name()?.to_os_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}
