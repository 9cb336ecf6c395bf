use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::domain::errors::DomainError;
use crate::infrastructure::config::LoggingConfig;

pub const LOG_FILE_PREFIX: &str = "artventure.log";

/// Flushes the file writer when the process exits
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Filter for the site logs: `RUST_LOG` when set, otherwise `level`
pub fn level_filter(level: &str) -> Result<EnvFilter, DomainError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = level.trim();
    if level.is_empty() {
        return Err(DomainError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }

    EnvFilter::try_new(level).map_err(|error| {
        DomainError::ValidationError(format!("Invalid logging.level '{}': {}", level, error))
    })
}

/// Install the global subscriber: console output, plus a daily file under
/// `config.dir` when `config.file` is set. Later calls are no-ops.
pub fn init_logger(config: &LoggingConfig) -> Result<(), DomainError> {
    if FILE_GUARD.get().is_some() || tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = level_filter(&config.level)?;

    let file_layer = if config.file {
        std::fs::create_dir_all(&config.dir).map_err(|error| {
            DomainError::InternalError(format!(
                "Failed to create log directory {:?}: {}",
                config.dir, error
            ))
        })?;

        let appender = RollingFileAppender::new(Rotation::DAILY, &config.dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);

        Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(true).with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|error| {
            DomainError::InternalError(format!("Failed to install log subscriber: {}", error))
        })?;

    tracing::debug!(file = config.file, dir = ?config.dir, "Logger initialized");
    Ok(())
}

pub fn debug(message: &str) {
    tracing::debug!("{}", message);
}

pub fn info(message: &str) {
    tracing::info!("{}", message);
}

pub fn warn(message: &str) {
    tracing::warn!("{}", message);
}

/// Blank messages are dropped
pub fn error(message: &str) {
    let message = message.trim();
    if !message.is_empty() {
        tracing::error!("{}", message);
    }
}
