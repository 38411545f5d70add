//! Error types for the file integrity monitor.
//!
//! The taxonomy separates recoverable scan errors (absorbed at the builder
//! boundary and converted to log events) from fatal errors (persistence and
//! configuration failures that terminate the run with a diagnostic).

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the scan, persistence, and configuration layers.
#[derive(Debug, Error)]
pub enum FimError {
    /// A single file could not be opened, stat'd, or read. Recoverable:
    /// the builder logs it and excludes the file from the baseline.
    #[error("cannot access file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory's contents could not be listed. Recoverable per-subtree,
    /// fatal only when the monitored root itself is unreadable.
    #[error("cannot read directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The baseline artifact could not be written or read.
    #[error("baseline persistence failed at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The baseline artifact exists but is not parsable. Distinct from the
    /// artifact being absent, which loads as an empty baseline.
    #[error("baseline artifact {path} is corrupt: {source}")]
    CorruptBaseline {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration, rejected at startup before any scanning.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl FimError {
    /// Whether this error is recoverable within a scan (logged and skipped)
    /// rather than fatal to the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FimError::FileAccess { .. } | FimError::DirectoryAccess { .. }
        )
    }
}
