//! CLI definitions and config resolution.
//!
//! Clap types only, plus the overlay of flags onto the optional TOML config
//! file: flags win over the file, the file wins over defaults.

use crate::config::MonitorConfig;
use crate::error::FimError;
use crate::hash::HashAlgorithm;
use clap::Parser;
use std::path::PathBuf;

/// Vigil - scan-based file integrity monitoring
#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Scan a directory tree and report changes against a recorded baseline")]
pub struct Cli {
    /// Directory tree to monitor
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Baseline artifact location
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Content digest algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Streaming read chunk size in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Hashing worker pool size
    #[arg(long)]
    pub workers: Option<usize>,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration from the config file (if any)
    /// overlaid with the flags.
    pub fn resolve_config(&self) -> Result<MonitorConfig, FimError> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)?,
            None => match &self.root {
                Some(root) => MonitorConfig::for_root(root.clone()),
                None => {
                    return Err(FimError::Configuration(
                        "no monitored root: pass --root or --config".to_string(),
                    ))
                }
            },
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(baseline) = &self.baseline {
            config.baseline = baseline.clone();
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = file.clone();
        }

        Ok(config)
    }
}
