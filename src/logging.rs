//! Tracing setup: coloured console output plus a plain `tests.log` file

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

pub const LOG_FILE_NAME: &str = "tests.log";

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("Cannot open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tracing already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// `MM-DD-YYYY HH:MM:SS` in local time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%m-%d-%Y %H:%M:%S"))
    }
}

/// `RUST_LOG` wins over the configured level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber; returns the log file path
pub fn init(config: &LogConfig) -> Result<PathBuf, LogInitError> {
    let path = config.output_dir.join(LOG_FILE_NAME);
    fs::create_dir_all(&config.output_dir).map_err(|source| LogInitError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LogInitError::Io {
            path: path.clone(),
            source,
        })?;

    let console = tracing_subscriber::fmt::layer()
        .with_timer(LocalTimestamp)
        .with_target(false);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTimestamp)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(path)
}
