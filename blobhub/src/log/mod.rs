//! Logging setup.
//!
//! Installs a `tracing` subscriber writing to a daily-rolling file in the
//! configured log directory, with an optional stderr copy for headless runs.
//! `RUST_LOG` overrides the configured level.
//!
//! # Example
//!
//! ```ignore
//! let config = ConfigFile::load_default()?;
//! let _guard = init_logging(&config.logging, false)?;
//! tracing::info!("ready");
//! ```

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// File name prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "blobhub.log";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter '{0}'")]
    Filter(String),

    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the background log writer alive. Dropping it flushes pending lines.
#[must_use = "logs stop being written when the guard is dropped"]
pub struct LogGuard {
    _worker: WorkerGuard,
    directory: PathBuf,
}

impl LogGuard {
    /// Directory receiving the log files.
    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, LogError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|_| LogError::Filter(level.to_string())),
    }
}

/// Install the global subscriber.
///
/// Must be called at most once per process, before any source thread starts
/// so that thread-local local-offset lookups succeed.
pub fn init_logging(config: &LoggingConfig, stderr: bool) -> Result<LogGuard, LogError> {
    std::fs::create_dir_all(&config.directory).map_err(|source| LogError::Directory {
        path: config.directory.clone(),
        source,
    })?;

    let filter = build_filter(&config.level)?;
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, Rfc3339);

    let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_thread_names(true);

    let stderr_layer = stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(timer)
            .with_target(false)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

    Ok(LogGuard {
        _worker: worker,
        directory: config.directory.clone(),
    })
}
