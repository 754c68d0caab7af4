//! File logging.
//!
//! The terminal belongs to the calendar while it runs, so log records only go
//! to rotating files in the log directory.

use crate::config::LogConfig;
use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "evcal";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Start logging as configured.  Returns `None` if logging is disabled.
///
/// The returned handle must be kept alive for as long as records should be
/// written.
pub(crate) fn init(config: &LogConfig) -> Result<Option<LoggerHandle>, LoggingError> {
    if !config.enabled {
        return Ok(None);
    }
    let dir = config
        .resolved_directory()
        .ok_or(LoggingError::NoDirectory)?;
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    let handle = Logger::try_with_str(&config.level)?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(detailed_format)
        .start()?;
    info!(
        "{} {} starting; logging to {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        dir.display()
    );
    Ok(Some(handle))
}

#[derive(Debug, Error)]
pub(crate) enum LoggingError {
    #[error("could not determine a directory for log files")]
    NoDirectory,
    #[error("failed to create log directory {}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to start logger")]
    Logger(#[from] FlexiLoggerError),
}
