//! Vigil CLI binary.
//!
//! One invocation is one monitor run: load the prior baseline, scan, report
//! changes, persist the new baseline. Exits 0 on success whether or not
//! changes were found; exits nonzero with one diagnostic on fatal errors.

use clap::Parser;
use std::process;
use tracing::{error, info};
use vigil::cli::Cli;
use vigil::logging::init_logging;
use vigil::monitor;
use vigil::report::ConsoleAlert;

fn main() {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vigil: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("vigil: {e}");
        process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!("Startup validation failed: {e}");
        eprintln!("vigil: {e}");
        process::exit(1);
    }

    let sink = ConsoleAlert;
    match monitor::run(&config, &sink) {
        Ok(summary) => {
            info!(
                files = summary.files_recorded,
                skipped = summary.entries_skipped,
                changes = summary.changes,
                "Run completed"
            );
        }
        Err(e) => {
            error!("Run failed: {e}");
            eprintln!("vigil: {e}");
            process::exit(1);
        }
    }
}
