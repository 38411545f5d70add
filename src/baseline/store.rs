//! Baseline persistence: JSON artifact with atomic replacement.
//!
//! The artifact is a plain `path -> {size, modified, digest}` mapping with
//! stable key ordering, so saving an unchanged baseline reproduces the file
//! byte for byte. Saves go through a sibling temp file and a rename so a
//! crash mid-write never leaves a half-written artifact in place.

use crate::baseline::Baseline;
use crate::error::FimError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads and saves the baseline artifact at a fixed location.
pub struct BaselineStore {
    location: PathBuf,
}

impl BaselineStore {
    pub fn new(location: PathBuf) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Load the persisted baseline.
    ///
    /// An absent artifact is the first-run bootstrap case and loads as an
    /// empty baseline; an artifact that exists but does not parse is a
    /// fatal [`FimError::CorruptBaseline`].
    pub fn load(&self) -> Result<Baseline, FimError> {
        let bytes = match fs::read(&self.location) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.location.display(), "No baseline artifact; starting empty");
                return Ok(Baseline::new());
            }
            Err(source) => {
                return Err(FimError::Persistence {
                    path: self.location.clone(),
                    source,
                })
            }
        };

        let baseline =
            serde_json::from_slice(&bytes).map_err(|source| FimError::CorruptBaseline {
                path: self.location.clone(),
                source,
            })?;
        debug!(path = %self.location.display(), "Loaded baseline artifact");
        Ok(baseline)
    }

    /// Serialize and atomically replace the artifact.
    pub fn save(&self, baseline: &Baseline) -> Result<(), FimError> {
        let json = serde_json::to_vec_pretty(baseline).map_err(|err| FimError::Persistence {
            path: self.location.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        })?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, &json).map_err(|source| FimError::Persistence {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.location).map_err(|source| {
            // Leave nothing behind on a failed rename.
            let _ = fs::remove_file(&temp_path);
            FimError::Persistence {
                path: self.location.clone(),
                source,
            }
        })?;

        info!(
            path = %self.location.display(),
            files = baseline.len(),
            "Baseline persisted"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .location
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| std::ffi::OsString::from("baseline"));
        name.push(".tmp");
        self.location.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::FileRecord;
    use tempfile::TempDir;

    fn sample_baseline() -> Baseline {
        let mut baseline = Baseline::new();
        baseline.insert(
            PathBuf::from("a.txt"),
            FileRecord {
                size: 5,
                modified: 1_700_000_000_000_000_000,
                digest: "aa".repeat(32),
            },
        );
        baseline.insert(
            PathBuf::from("nested/b.txt"),
            FileRecord {
                size: 9,
                modified: 1_700_000_001_000_000_000,
                digest: "bb".repeat(32),
            },
        );
        baseline
    }

    #[test]
    fn test_load_missing_artifact_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline.json"));

        let baseline = store.load().unwrap();
        assert!(baseline.is_empty());
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline.json"));

        let original = sample_baseline();
        store.save(&original).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_resave_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let location = temp_dir.path().join("baseline.json");
        let store = BaselineStore::new(location.clone());

        store.save(&sample_baseline()).unwrap();
        let first = fs::read(&location).unwrap();

        let reloaded = store.load().unwrap();
        store.save(&reloaded).unwrap();
        let second = fs::read(&location).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline.json"));

        store.save(&sample_baseline()).unwrap();
        store.save(&Baseline::new()).unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_artifact_is_distinct_error() {
        let temp_dir = TempDir::new().unwrap();
        let location = temp_dir.path().join("baseline.json");
        fs::write(&location, "{not json").unwrap();

        let err = BaselineStore::new(location).load().unwrap_err();
        assert!(matches!(err, FimError::CorruptBaseline { .. }));
    }

    #[test]
    fn test_save_to_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("no_such_dir").join("baseline.json"));

        let err = store.save(&sample_baseline()).unwrap_err();
        assert!(matches!(err, FimError::Persistence { .. }));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline.json"));

        store.save(&sample_baseline()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("baseline.json")]);
    }
}
