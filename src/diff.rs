//! Change detection between two baselines.
//!
//! Pure symmetric-difference-style comparison: no I/O, no side effects.
//! Every path in the union of the two baselines receives at most one
//! classification; unchanged paths receive none.

use crate::baseline::Baseline;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Classification of one path's change between two baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Removed => write!(f, "removed"),
        }
    }
}

/// The set of classified changes from one comparison. Transient: built by
/// [`detect`], consumed by the reporter, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeMap<PathBuf, ChangeKind>,
}

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<ChangeKind> {
        self.changes.get(path).copied()
    }

    /// Iterate changes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, ChangeKind)> {
        self.changes.iter().map(|(path, kind)| (path, *kind))
    }

    fn insert(&mut self, path: PathBuf, kind: ChangeKind) {
        self.changes.insert(path, kind);
    }
}

/// Compare a freshly scanned baseline against the previously persisted one.
///
/// Paths only in `new` are `Added`; paths in both whose size, modification
/// time, or digest differ are `Modified`; paths only in `old` are `Removed`.
/// Paths present in both with all fields equal get no entry.
pub fn detect(old: &Baseline, new: &Baseline) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, record) in new.iter() {
        match old.get(path) {
            None => changes.insert(path.clone(), ChangeKind::Added),
            Some(previous) if previous != record => {
                changes.insert(path.clone(), ChangeKind::Modified)
            }
            Some(_) => {}
        }
    }

    for (path, _) in old.iter() {
        if !new.contains(path) {
            changes.insert(path.clone(), ChangeKind::Removed);
        }
    }

    changes
}
