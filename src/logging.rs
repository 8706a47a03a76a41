//! `tracing` subscriber setup.
//!
//! Commands that print to the terminal log to stderr. The TUI owns the screen,
//! so it logs to `PRECIOS_LOG_FILE` when set and drops log output otherwise.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AppError;

pub const LOG_FILE_ENV: &str = "PRECIOS_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// The log file if configured, otherwise nothing.
    FileOnly,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_file: std::env::var(LOG_FILE_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

pub fn init_logging(config: &LoggingConfig, target: LogTarget) -> Result<(), AppError> {
    let writer = match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::usage(format!("Failed to open log file '{}': {e}", path.display())))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (None, LogTarget::Stderr) => BoxMakeWriter::new(std::io::stderr),
        (None, LogTarget::FileOnly) => BoxMakeWriter::new(std::io::sink),
    };

    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| AppError::usage(format!("Invalid RUST_LOG '{}': {e}", config.log_level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(matches!((&config.log_file, target), (None, LogTarget::Stderr)))
        .try_init()
        .map_err(|e| AppError::usage(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}
