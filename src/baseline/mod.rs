//! Baseline data model: per-file records and the path-keyed snapshot.

pub mod builder;
pub mod store;

pub use builder::{BaselineBuilder, Scan, SkippedEntry};
pub use store::BaselineStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One regular file's observed state at scan time.
///
/// Immutable once constructed: a changed file produces a new record, never a
/// mutated one. Field order is fixed and load-bearing for the byte-stable
/// baseline artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File size in bytes.
    pub size: u64,
    /// Modification time as nanoseconds since the Unix epoch.
    pub modified: u64,
    /// Hex-encoded content digest, width fixed by the algorithm.
    pub digest: String,
}

/// Snapshot of monitored files, keyed by root-relative path.
///
/// The BTreeMap gives stable key ordering, so re-serializing an unchanged
/// baseline is byte-for-byte identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    records: BTreeMap<PathBuf, FileRecord>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, record: FileRecord) {
        self.records.insert(path, record);
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(PathBuf, FileRecord)> for Baseline {
    fn from_iter<I: IntoIterator<Item = (PathBuf, FileRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
