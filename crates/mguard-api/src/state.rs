//! # Application State
//!
//! Shared state for the Axum application: the gate and baseline engines
//! behind `Arc`s, cheap to clone per request.

use std::sync::Arc;

use mguard_baseline::{
    BaselineCalculator, BaselineEngine, InMemoryBaselineStore, InMemoryOrderHistory,
};
use mguard_gate::{GateEngine, InMemoryGateStore, OverrideLedger, ThresholdTable};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gate evaluation engine.
    pub gates: Arc<GateEngine>,
    /// The baseline calculation engine.
    pub baselines: Arc<BaselineEngine>,
}

impl AppState {
    /// Wire the state from externally constructed engines.
    pub fn new(gates: Arc<GateEngine>, baselines: Arc<BaselineEngine>) -> Self {
        Self { gates, baselines }
    }

    /// Fully in-memory wiring with the stock threshold table.
    ///
    /// Used by the CLI's `serve` command and by tests. Order history
    /// starts empty — ingestion is the external collaborator's job, so a
    /// fresh in-memory server answers baselines as zero/provisional.
    pub fn in_memory() -> Self {
        Self::with_thresholds(ThresholdTable::default())
    }

    /// In-memory wiring with an explicit threshold table.
    pub fn with_thresholds(table: ThresholdTable) -> Self {
        let gates = GateEngine::new(
            table,
            Arc::new(InMemoryGateStore::new()),
            Arc::new(OverrideLedger::new()),
        );
        let baselines = BaselineEngine::new(
            Arc::new(InMemoryOrderHistory::new()),
            Arc::new(InMemoryBaselineStore::new()),
            BaselineCalculator::default(),
        );
        Self {
            gates: Arc::new(gates),
            baselines: Arc::new(baselines),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
