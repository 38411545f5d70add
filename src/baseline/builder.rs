//! Baseline builder: walks the monitored tree and hashes every regular file.
//!
//! The walk itself is single-threaded; hashing is fanned out across a
//! bounded pool of worker threads feeding from a shared queue of discovered
//! files, with per-worker partial results merged once all workers finish.
//! Per-file and per-directory access failures are logged and skipped so a
//! single unreadable entry never aborts the scan; only an unreadable root is
//! fatal.

use crate::baseline::{Baseline, FileRecord};
use crate::error::FimError;
use crate::hash::{self, HashAlgorithm, DEFAULT_CHUNK_SIZE};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

/// A file or directory subtree excluded from the baseline by a recoverable
/// access failure.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    /// Root-relative path of the skipped file or directory.
    pub path: PathBuf,
    /// Human-readable failure description, already logged.
    pub reason: String,
}

/// Result of one full scan: the snapshot plus the entries it had to skip.
#[derive(Debug, Clone)]
pub struct Scan {
    pub baseline: Baseline,
    pub skipped: Vec<SkippedEntry>,
}

/// A regular file discovered by the walk, pending hashing.
struct PendingFile {
    path: PathBuf,
    relative: PathBuf,
    size: u64,
    modified: u64,
}

/// Builds a [`Baseline`] from a full re-scan of a directory tree.
pub struct BaselineBuilder {
    root: PathBuf,
    algorithm: HashAlgorithm,
    chunk_size: usize,
    workers: usize,
}

impl BaselineBuilder {
    /// Create a builder for the given root with default chunk size and a
    /// worker count derived from available parallelism.
    pub fn new(root: PathBuf, algorithm: HashAlgorithm) -> Self {
        Self {
            root,
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: default_workers(),
        }
    }

    /// Set the streaming read chunk size (tuning only).
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the hashing worker pool size.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Scan the tree and build the baseline.
    ///
    /// Only regular files are recorded; symlinks, sockets, and device files
    /// are excluded by policy (the walk does not follow links). Returns a
    /// fatal [`FimError::DirectoryAccess`] only when the root itself cannot
    /// be read.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<Scan, FimError> {
        let start = Instant::now();
        info!(algorithm = %self.algorithm, "Starting baseline scan");

        // Unreadable root is the one fatal walk failure.
        std::fs::read_dir(&self.root).map_err(|source| FimError::DirectoryAccess {
            path: self.root.clone(),
            source,
        })?;

        let mut skipped = Vec::new();
        let pending = self.collect_files(&mut skipped);
        debug!(file_count = pending.len(), "Walk completed");

        let (baseline, hash_skipped) = self.hash_files(pending);
        skipped.extend(hash_skipped);

        info!(
            files = baseline.len(),
            skipped = skipped.len(),
            duration_ms = start.elapsed().as_millis(),
            "Baseline scan completed"
        );

        Ok(Scan { baseline, skipped })
    }

    /// Walk the tree and stat every regular file. Directory listing errors
    /// skip the subtree; stat errors skip the file. Both are logged once.
    fn collect_files(&self, skipped: &mut Vec<SkippedEntry>) -> Vec<PendingFile> {
        let mut pending = Vec::new();

        for entry in walkdir::WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    warn!(path = %path.display(), error = %err, "Skipping unreadable directory entry");
                    skipped.push(SkippedEntry {
                        path: self.relative(&path),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            // file_type() is symlink-aware when links are not followed, so
            // this also excludes symlinks, sockets, and device files.
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping file: stat failed");
                    skipped.push(SkippedEntry {
                        path: self.relative(&path),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            pending.push(PendingFile {
                relative: self.relative(&path),
                path,
                size: metadata.len(),
                modified: modified_ns(metadata.modified().ok()),
            });
        }

        pending
    }

    /// Hash the pending files on a bounded worker pool.
    ///
    /// Workers pull from a shared queue until it drains; each keeps a
    /// partial record list that is merged single-threaded afterwards, so the
    /// baseline map itself sees no concurrent writes.
    fn hash_files(&self, pending: Vec<PendingFile>) -> (Baseline, Vec<SkippedEntry>) {
        let workers = self.workers.min(pending.len().max(1));
        let queue = Mutex::new(VecDeque::from(pending));

        let partials: Vec<(Vec<(PathBuf, FileRecord)>, Vec<SkippedEntry>)> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|_| scope.spawn(|| self.hash_worker(&queue)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().expect("hash worker panicked"))
                    .collect()
            });

        let mut baseline = Baseline::new();
        let mut skipped = Vec::new();
        for (records, failures) in partials {
            for (path, record) in records {
                baseline.insert(path, record);
            }
            skipped.extend(failures);
        }
        (baseline, skipped)
    }

    fn hash_worker(
        &self,
        queue: &Mutex<VecDeque<PendingFile>>,
    ) -> (Vec<(PathBuf, FileRecord)>, Vec<SkippedEntry>) {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        while let Some(file) = queue.lock().pop_front() {
            match hash::digest_file(&file.path, self.algorithm, self.chunk_size) {
                Ok(digest) => {
                    records.push((
                        file.relative,
                        FileRecord {
                            size: file.size,
                            modified: file.modified,
                            digest,
                        },
                    ));
                }
                Err(err) => {
                    // File vanished or became unreadable between stat and
                    // read. Recoverable: log once and exclude it.
                    warn!(path = %file.path.display(), error = %err, "Skipping file: read failed");
                    skipped.push(SkippedEntry {
                        path: file.relative,
                        reason: err.to_string(),
                    });
                }
            }
        }

        (records, skipped)
    }

    /// Key paths relative to the monitored root so baselines stay
    /// comparable when the root moves.
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(8)
}

fn modified_ns(modified: Option<SystemTime>) -> u64 {
    modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scan(root: &Path) -> Scan {
        BaselineBuilder::new(root.to_path_buf(), HashAlgorithm::Sha256)
            .build()
            .unwrap()
    }

    #[test]
    fn test_records_all_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("file1.txt"), "content1").unwrap();
        fs::write(root.join("file2.txt"), "content2").unwrap();

        let scan = scan(root);
        assert_eq!(scan.baseline.len(), 2);
        assert!(scan.skipped.is_empty());
        assert_eq!(scan.baseline.get(Path::new("file1.txt")).unwrap().size, 8);
    }

    #[test]
    fn test_descends_into_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/deep.txt"), "deep").unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();

        let scan = scan(root);
        assert_eq!(scan.baseline.len(), 2);
        assert!(scan.baseline.contains(Path::new("a/b/deep.txt")));
    }

    #[test]
    fn test_keys_are_root_relative() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("file.txt"), "x").unwrap();

        let scan = scan(root);
        let (path, _) = scan.baseline.iter().next().unwrap();
        assert_eq!(path, Path::new("file.txt"));
    }

    #[test]
    fn test_directories_are_not_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("empty_dir")).unwrap();
        fs::write(root.join("file.txt"), "x").unwrap();

        let scan = scan(root);
        assert_eq!(scan.baseline.len(), 1);
        assert!(!scan.baseline.contains(Path::new("empty_dir")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("target.txt"), "real").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let scan = scan(root);
        assert_eq!(scan.baseline.len(), 1);
        assert!(scan.baseline.contains(Path::new("target.txt")));
        assert!(!scan.baseline.contains(Path::new("link.txt")));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = BaselineBuilder::new(missing, HashAlgorithm::Sha256)
            .build()
            .unwrap_err();
        assert!(matches!(err, FimError::DirectoryAccess { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..3 {
            fs::write(root.join(format!("ok{i}.txt")), "readable").unwrap();
        }
        let locked = root.join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root; nothing to assert then.
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let scan = scan(root);
        assert_eq!(scan.baseline.len(), 3);
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].path, Path::new("locked.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_skips_subtree_not_scan() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("visible.txt"), "readable").unwrap();
        let locked_dir = root.join("locked");
        fs::create_dir(&locked_dir).unwrap();
        fs::write(locked_dir.join("hidden.txt"), "unreachable").unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root; nothing to assert then.
        if fs::read_dir(&locked_dir).is_ok() {
            fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let scan = scan(root);

        // Restore so TempDir cleanup can remove the directory.
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(scan.baseline.len(), 1);
        assert!(scan.baseline.contains(Path::new("visible.txt")));
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].path, Path::new("locked"));
    }

    #[test]
    fn test_single_worker_matches_pool() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..20 {
            fs::write(root.join(format!("f{i:02}.txt")), format!("content {i}")).unwrap();
        }

        let serial = BaselineBuilder::new(root.to_path_buf(), HashAlgorithm::Blake3)
            .workers(1)
            .build()
            .unwrap();
        let pooled = BaselineBuilder::new(root.to_path_buf(), HashAlgorithm::Blake3)
            .workers(4)
            .build()
            .unwrap();

        assert_eq!(serial.baseline, pooled.baseline);
    }
}
