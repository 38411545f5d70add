//! Change reporting: structured log events plus an immediate alert channel.
//!
//! Every detected change produces one timestamped log event (via the
//! tracing subscriber configured at startup) and one synchronous alert on
//! the injected sink. An empty change set produces a single informational
//! event instead of silence, so "ran and found nothing" is distinguishable
//! from "did not run".

use crate::diff::{ChangeKind, ChangeSet};
use std::path::Path;
use tracing::info;

/// Destination for immediate, user-facing change notifications.
///
/// Console output is the reference implementation; other mechanisms plug in
/// through this trait.
pub trait AlertSink {
    /// Emit one notification for a classified change.
    fn alert(&self, path: &Path, kind: ChangeKind);

    /// Emit a run-level informational notice.
    fn notice(&self, message: &str);
}

/// Reference sink: one stdout line per change.
#[derive(Debug, Default)]
pub struct ConsoleAlert;

impl AlertSink for ConsoleAlert {
    fn alert(&self, path: &Path, kind: ChangeKind) {
        println!("{kind}: {}", path.display());
    }

    fn notice(&self, message: &str) {
        println!("{message}");
    }
}

/// Emits a change set to the log and to an alert sink.
pub struct Reporter<'a> {
    sink: &'a dyn AlertSink,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: &'a dyn AlertSink) -> Self {
        Self { sink }
    }

    /// Report every entry in path order, or a "no changes" event when empty.
    pub fn report(&self, changes: &ChangeSet) {
        if changes.is_empty() {
            info!("No changes detected");
            self.sink.notice("No changes detected.");
            return;
        }

        for (path, kind) in changes.iter() {
            info!(kind = %kind, path = %path.display(), "Change detected");
            self.sink.alert(path, kind);
        }
    }
}
