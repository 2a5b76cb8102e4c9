//! Diagnostic logging
//!
//! Rolling log files under the data directory's `logs/`, set up once per
//! process. Log lines carry ids, counts and event names only; decrypted
//! mood or journal text is never logged.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;

use crate::error::{AimsError, AimsResult};

const LOG_FILE_BASENAME: &str = "aims";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Start file logging at `level` in `log_dir`
///
/// Repeating the call with the same directory and level is a no-op; a
/// different directory or level is rejected.
pub fn init_logging(level: &str, log_dir: &Path) -> AimsResult<()> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> AimsResult<LoggingState> {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            AimsError::Io(format!(
                "Failed to create log directory {}: {}",
                log_dir.display(),
                e
            ))
        })?;

        let logger = Logger::try_with_str(level)
            .map_err(|e| AimsError::Config(format!("Invalid log level '{}': {}", level, e)))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|e| AimsError::Config(format!("Failed to start logger: {}", e)))?;

        log::info!(
            "event=app_start version={} level={}",
            env!("CARGO_PKG_VERSION"),
            level
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    if state.log_dir != log_dir {
        return Err(AimsError::Config(format!(
            "Logging already initialized at {}; refusing to switch to {}",
            state.log_dir.display(),
            log_dir.display()
        )));
    }
    if state.level != level {
        return Err(AimsError::Config(format!(
            "Logging already initialized with level '{}'; refusing to switch to '{}'",
            state.level, level
        )));
    }

    Ok(())
}

fn normalize_level(level: &str) -> AimsResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(AimsError::Config(format!(
            "Unsupported log level '{}': expected trace, debug, info, warn, error or off",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("warning").unwrap(), "warn");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn test_init_is_idempotent_and_rejects_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let other_dir = temp_dir.path().join("other");

        init_logging("info", &log_dir).unwrap();
        init_logging("info", &log_dir).unwrap();
        assert!(log_dir.exists());

        let err = init_logging("debug", &log_dir).unwrap_err();
        assert!(err.to_string().contains("refusing to switch"));

        let err = init_logging("info", &other_dir).unwrap_err();
        assert!(err.to_string().contains("refusing to switch"));
    }
}
