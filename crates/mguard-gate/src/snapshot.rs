//! # Metric Snapshot — Ingestion Boundary Contract
//!
//! The shape in which the external metric source hands current readings to
//! the evaluator: named rates as decimal fractions (`0.003` = 0.3%) plus
//! raw counters used only for message formatting. How the rates were
//! collected (ESP polling, webhook aggregation) is the collaborator's
//! concern; the evaluator consumes whatever snapshot it is given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mguard_core::Timestamp;

/// A point-in-time reading of the metrics for one gate.
///
/// Missing fields are legal — the evaluator classifies what is present and
/// flags the rest as unknown rather than failing the job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Named rates as decimal fractions.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    /// Raw counters (denominators) used for display counts only.
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
    /// When the source captured these readings, if it said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<Timestamp>,
}

impl MetricSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style rate insertion.
    pub fn with_rate(mut self, key: impl Into<String>, value: f64) -> Self {
        self.rates.insert(key.into(), value);
        self
    }

    /// Builder-style counter insertion.
    pub fn with_counter(mut self, key: impl Into<String>, value: u64) -> Self {
        self.counters.insert(key.into(), value);
        self
    }

    /// The named rate, if present.
    pub fn rate(&self, key: &str) -> Option<f64> {
        self.rates.get(key).copied()
    }

    /// The named counter, if present.
    pub fn counter(&self, key: &str) -> Option<u64> {
        self.counters.get(key).copied()
    }

    /// Whether the snapshot carries no rates at all.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
