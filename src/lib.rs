//! Vigil: Scan-Based File Integrity Monitoring
//!
//! Records a baseline of per-file metadata and content digests for a
//! directory tree and, on subsequent runs, classifies every path as added,
//! modified, or removed relative to that baseline.

pub mod baseline;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod logging;
pub mod monitor;
pub mod report;
