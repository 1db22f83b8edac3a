//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<log_dir>/cube.log`
//! and rotation on startup keeping 5 historical files.

use crate::error::{CubeError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (cube.log.1 through cube.log.5)
const MAX_LOG_FILES: u8 = 5;

/// Name of the active log file
pub const LOG_FILE_NAME: &str = "cube.log";

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG`. Fails
/// with [`CubeError::LoggingError`] if a global subscriber is already set.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    rotate_logs_on_startup(&log_dir.join(LOG_FILE_NAME))?;

    // Rotation is handled above, once per session
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("cube")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| CubeError::LoggingError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CubeError::LoggingError(Box::new(e)))?;

    tracing::info!("smartcube v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Shift `cube.log` to `cube.log.1`, `.1` to `.2` and so on, dropping `.5`
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| CubeError::LoggingError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| CubeError::LoggingError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}
