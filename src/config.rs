//! Monitor configuration: TOML file loading, defaults, and validation.
//!
//! The configuration surface is explicit: monitored root, baseline artifact
//! location, digest algorithm, streaming chunk size, and worker pool size.
//! Validation runs at startup, before any scanning begins.

use crate::error::FimError;
use crate::hash::{HashAlgorithm, DEFAULT_CHUNK_SIZE};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for one monitor run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Directory tree to monitor. Must exist and be readable.
    pub root: PathBuf,

    /// Location of the persisted baseline artifact.
    #[serde(default = "default_baseline_path")]
    pub baseline: PathBuf,

    /// Content digest algorithm. Explicit: switching algorithms makes every
    /// existing record compare as modified.
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Streaming read chunk size in bytes (tuning only).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Hashing worker pool size. Defaults to available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_baseline_path() -> PathBuf {
    PathBuf::from("baseline.json")
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl MonitorConfig {
    /// Configuration with defaults for everything but the monitored root.
    pub fn for_root(root: PathBuf) -> Self {
        Self {
            root,
            baseline: default_baseline_path(),
            algorithm: HashAlgorithm::default(),
            chunk_size: default_chunk_size(),
            workers: None,
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, FimError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FimError::Configuration(format!("cannot read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content)
            .map_err(|e| FimError::Configuration(format!("cannot parse config file {path:?}: {e}")))
    }

    /// Validate before scanning: the root must be a readable directory and
    /// the chunk size nonzero.
    pub fn validate(&self) -> Result<(), FimError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            FimError::Configuration(format!(
                "monitored root {:?} is not accessible: {e}",
                self.root
            ))
        })?;
        if !metadata.is_dir() {
            return Err(FimError::Configuration(format!(
                "monitored root {:?} is not a directory",
                self.root
            )));
        }
        if self.chunk_size == 0 {
            return Err(FimError::Configuration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(FimError::Configuration(
                "workers must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::for_root(PathBuf::from("."));
        assert_eq!(config.baseline, PathBuf::from("baseline.json"));
        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.workers, None);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("vigil.toml");
        fs::write(
            &config_path,
            r#"
root = "/srv/data"
baseline = "/var/lib/vigil/baseline.json"
algorithm = "blake3"
chunk_size = 8192

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = MonitorConfig::load(&config_path).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/data"));
        assert_eq!(config.algorithm, HashAlgorithm::Blake3);
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unparsable_config_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("vigil.toml");
        fs::write(&config_path, "root = [broken").unwrap();

        let err = MonitorConfig::load(&config_path).unwrap_err();
        assert!(matches!(err, FimError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = MonitorConfig::for_root(temp_dir.path().join("absent"));
        assert!(matches!(
            config.validate(),
            Err(FimError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "not a directory").unwrap();

        let config = MonitorConfig::for_root(file);
        assert!(matches!(
            config.validate(),
            Err(FimError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = MonitorConfig::for_root(temp_dir.path().to_path_buf());
        config.chunk_size = 0;
        assert!(matches!(
            config.validate(),
            Err(FimError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_accepts_directory_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = MonitorConfig::for_root(temp_dir.path().to_path_buf());
        assert!(config.validate().is_ok());
    }
}
