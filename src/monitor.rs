//! Run orchestration: load prior baseline, scan, diff, report, persist.

use crate::baseline::{BaselineBuilder, BaselineStore};
use crate::config::MonitorConfig;
use crate::diff;
use crate::error::FimError;
use crate::report::{AlertSink, Reporter};
use tracing::{info, instrument};

/// Outcome of one completed monitor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files recorded in the new baseline.
    pub files_recorded: usize,
    /// Files and directory subtrees excluded by recoverable access failures.
    pub entries_skipped: usize,
    /// Detected changes relative to the prior baseline.
    pub changes: usize,
}

/// Execute one full monitor run.
///
/// The freshly scanned state is persisted as the new baseline even when no
/// changes were detected: each run's baseline is always the most recently
/// observed state. Fatal errors (unreadable root, persistence failure)
/// propagate; per-file failures were already absorbed and logged by the
/// builder.
#[instrument(skip(config, sink), fields(root = %config.root.display()))]
pub fn run(config: &MonitorConfig, sink: &dyn AlertSink) -> Result<RunSummary, FimError> {
    let store = BaselineStore::new(config.baseline.clone());
    let previous = store.load()?;
    info!(files = previous.len(), "Loaded prior baseline");

    let mut builder = BaselineBuilder::new(config.root.clone(), config.algorithm)
        .chunk_size(config.chunk_size);
    if let Some(workers) = config.workers {
        builder = builder.workers(workers);
    }
    let scan = builder.build()?;

    let changes = diff::detect(&previous, &scan.baseline);
    Reporter::new(sink).report(&changes);

    store.save(&scan.baseline)?;

    Ok(RunSummary {
        files_recorded: scan.baseline.len(),
        entries_skipped: scan.skipped.len(),
        changes: changes.len(),
    })
}
