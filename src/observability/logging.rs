//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Route log lines to the append-only log file
//! - Fall back to stderr when the log file cannot be opened
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via `RUST_LOG`
//! - Writes happen on a background thread (non-blocking appender)

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default append-only log file.
pub const DEFAULT_LOG_FILE: &str = "/var/log/splendid/splendid.log";

const DEFAULT_FILTER: &str = "splendid=info,tower_http=info";

/// Keeps the background writer alive; drop it last.
pub struct LoggingGuard {
    _worker: WorkerGuard,
    /// Set when the log file could not be used and stderr was chosen instead.
    pub fallback: Option<String>,
}

/// Split a log file path into the directory and file name the appender wants.
fn split_log_path(path: &Path) -> Option<(PathBuf, String)> {
    let file_name = path.file_name()?.to_str()?.to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, file_name))
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, String> {
    let (dir, file_name) =
        split_log_path(path).ok_or_else(|| format!("invalid log file path {}", path.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))
}

/// Initialize the global subscriber, writing to `log_file` when possible.
pub fn init_logging(log_file: Option<&Path>) -> LoggingGuard {
    let (writer, worker, fallback) = match log_file.map(file_appender) {
        Some(Ok(appender)) => {
            let (writer, worker) = tracing_appender::non_blocking(appender);
            (writer, worker, None)
        }
        Some(Err(reason)) => {
            let (writer, worker) = tracing_appender::non_blocking(std::io::stderr());
            (writer, worker, Some(reason))
        }
        None => {
            let (writer, worker) = tracing_appender::non_blocking(std::io::stderr());
            (writer, worker, None)
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(fallback.is_some() || log_file.is_none()),
        )
        .init();

    LoggingGuard {
        _worker: worker,
        fallback,
    }
}
