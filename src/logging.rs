//! Logging setup on the `tracing` stack.
//!
//! The subscriber is constructed once at process start from configuration
//! and handed to the runtime, rather than configured as ambient import-time
//! state. The default destination is an append-only log file so the event
//! log stays separate from the alert channel on stdout.

use crate::error::FimError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (when output is "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Colored output (text format on stdout only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "file".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("vigil.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system.
///
/// Filter priority: the `VIGIL_LOG` environment variable wins over the
/// configured level. Must be called at most once per process.
pub fn init_logging(config: &LoggingConfig) -> Result<(), FimError> {
    let filter = build_env_filter(config)?;
    let base_subscriber = Registry::default().with(filter);

    let to_file = match config.output.as_str() {
        "file" => true,
        "stdout" => false,
        other => {
            return Err(FimError::Configuration(format!(
                "invalid log output: {other} (must be 'stdout' or 'file')"
            )))
        }
    };

    let use_json = match config.format.as_str() {
        "json" => true,
        "text" => false,
        other => {
            return Err(FimError::Configuration(format!(
                "invalid log format: {other} (must be 'json' or 'text')"
            )))
        }
    };

    if to_file {
        let writer = open_log_file(&config.file)?;
        if use_json {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(writer),
                )
                .init();
        } else {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
    } else if use_json {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stdout),
            )
            .init();
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File, FimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FimError::Configuration(format!("failed to create log directory: {e}"))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FimError::Configuration(format!("failed to open log file {path:?}: {e}")))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, FimError> {
    if let Ok(filter) = EnvFilter::try_from_env("VIGIL_LOG") {
        return Ok(filter);
    }

    match config.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {
            Ok(EnvFilter::new(config.level.as_str()))
        }
        other => Err(FimError::Configuration(format!(
            "invalid log level: {other}"
        ))),
    }
}
