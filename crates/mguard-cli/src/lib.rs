//! # mguard-cli — CLI Tool for the Merchant Guard Stack
//!
//! Provides the `mguard` command-line interface for running the engines
//! outside the API server: one-shot evaluations and baseline calculations
//! over files (useful in scheduler containers and when reproducing a
//! merchant's state from exported data), threshold-table inspection, and
//! serving the HTTP API.
//!
//! ## Subcommands
//!
//! - `mguard evaluate` — Evaluate one gate from a metric snapshot file.
//! - `mguard baseline` — Calculate a baseline from an order-history file.
//! - `mguard thresholds` — Print or validate threshold configuration.
//! - `mguard serve` — Serve the HTTP API with in-memory stores.

pub mod baseline;
pub mod evaluate;
pub mod serve;
pub mod thresholds;

use std::path::Path;

use mguard_core::Timestamp;

/// Parse an optional `--at` timestamp, defaulting to the current time.
///
/// Only UTC `Z`-suffixed timestamps are accepted, matching the engines'
/// persistence format.
pub fn resolve_clock(at: Option<&str>) -> anyhow::Result<Timestamp> {
    match at {
        Some(s) => Ok(Timestamp::parse(s)?),
        None => Ok(Timestamp::now()),
    }
}

/// Read a whole file with a path-carrying error message.
pub fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))
}
