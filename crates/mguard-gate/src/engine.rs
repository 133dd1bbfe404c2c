//! # Gate Engine — Job Orchestrator
//!
//! Ties the threshold table, evaluator, tracker, store, and override
//! ledger together into the unit the external scheduler invokes.
//!
//! ## Serialization
//!
//! Evaluations of different merchants — and of different gate types for
//! one merchant — run freely in parallel. Re-evaluation of the *same*
//! `(merchant, gate_type)` pair is serialized with a per-key mutex: the
//! grace-period transition reads the prior record and writes the next
//! one, and a lost update could re-anchor an expiry that should have held
//! steady. The store's version check additionally guards against writers
//! outside this process; a conflicting write is retried once before the
//! transient error surfaces to the scheduler.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use mguard_core::{ActorId, Feature, GateType, MerchantId, Timestamp};

use crate::error::GateError;
use crate::evaluator::evaluate_gate;
use crate::ledger::{GateOverride, OverrideLedger};
use crate::snapshot::MetricSnapshot;
use crate::state::GateState;
use crate::store::GateStateStore;
use crate::thresholds::ThresholdTable;

/// The gate evaluation engine for one deployment.
pub struct GateEngine {
    table: ThresholdTable,
    store: Arc<dyn GateStateStore>,
    ledger: Arc<OverrideLedger>,
    eval_locks: DashMap<(MerchantId, GateType), Arc<Mutex<()>>>,
}

impl std::fmt::Debug for GateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateEngine")
            .field("overrides", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

impl GateEngine {
    /// Create an engine over a threshold table, a store, and a shared
    /// override ledger.
    pub fn new(
        table: ThresholdTable,
        store: Arc<dyn GateStateStore>,
        ledger: Arc<OverrideLedger>,
    ) -> Self {
        Self {
            table,
            store,
            ledger,
            eval_locks: DashMap::new(),
        }
    }

    /// The active threshold table.
    pub fn thresholds(&self) -> &ThresholdTable {
        &self.table
    }

    /// The shared override ledger.
    pub fn ledger(&self) -> &Arc<OverrideLedger> {
        &self.ledger
    }

    /// Evaluate one gate for one merchant at the current time.
    pub fn evaluate(
        &self,
        merchant_id: MerchantId,
        gate_type: GateType,
        snapshot: &MetricSnapshot,
    ) -> Result<GateState, GateError> {
        self.evaluate_at(merchant_id, gate_type, snapshot, Timestamp::now())
    }

    /// Evaluate one gate for one merchant with an explicit clock.
    ///
    /// The explicit clock keeps the grace-period arithmetic testable and
    /// lets backfill jobs evaluate historical snapshots faithfully.
    pub fn evaluate_at(
        &self,
        merchant_id: MerchantId,
        gate_type: GateType,
        snapshot: &MetricSnapshot,
        now: Timestamp,
    ) -> Result<GateState, GateError> {
        let thresholds = self.table.get(gate_type)?;

        let key_lock = self
            .eval_locks
            .entry((merchant_id.clone(), gate_type))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = key_lock.lock();

        // One retry: the per-key lock serializes this engine's own jobs,
        // so a version miss means an out-of-process writer got between
        // our read and write. Re-read once and re-derive.
        for attempt in 0..2 {
            let prior = self.store.get(&merchant_id, gate_type);
            let next = evaluate_gate(
                merchant_id.clone(),
                gate_type,
                thresholds,
                snapshot,
                prior.as_ref(),
                now,
            );

            if prior.as_ref().map(|p| p.status) != Some(next.status) {
                tracing::info!(
                    merchant = %merchant_id,
                    gate = %gate_type,
                    from = prior.as_ref().map(|p| p.status.as_str()).unwrap_or("<none>"),
                    to = next.status.as_str(),
                    "gate status transition"
                );
            }

            match self.store.put(next.clone(), prior.map(|p| p.version)) {
                Ok(()) => return Ok(next),
                Err(GateError::Conflict { .. }) if attempt == 0 => {
                    tracing::warn!(
                        merchant = %merchant_id,
                        gate = %gate_type,
                        "gate-state write conflict, retrying once"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(GateError::Conflict {
            merchant: merchant_id,
            gate: gate_type,
        })
    }

    /// The live record for a merchant/gate pair, if any.
    pub fn gate_state(&self, merchant_id: &MerchantId, gate_type: GateType) -> Option<GateState> {
        self.store.get(merchant_id, gate_type)
    }

    /// All live records for one merchant.
    pub fn merchant_states(&self, merchant_id: &MerchantId) -> Vec<GateState> {
        self.store.list_for(merchant_id)
    }

    /// Remove every gate record for a merchant (merchant deletion only).
    pub fn remove_merchant(&self, merchant_id: &MerchantId) -> usize {
        self.eval_locks.retain(|k, _| &k.0 != merchant_id);
        self.store.remove_merchant(merchant_id)
    }

    /// Record a manual override for the merchant/gate pair.
    ///
    /// Appends to the ledger and returns the entry; the persisted
    /// [`GateState`] is not touched.
    pub fn record_override(
        &self,
        merchant_id: MerchantId,
        gate_type: GateType,
        actor: ActorId,
        reason: impl Into<String>,
    ) -> GateOverride {
        self.ledger
            .record(merchant_id, gate_type, actor, reason, Timestamp::now())
    }

    /// The features actually blocked for a state as of `now`, after
    /// consulting the override ledger.
    ///
    /// An override within the current failing episode empties the set
    /// until the next evaluation naturally changes the status.
    pub fn effective_blocked_features(
        &self,
        state: &GateState,
        now: Timestamp,
    ) -> BTreeSet<Feature> {
        if !state.effective_status(now).is_blocking() {
            return BTreeSet::new();
        }
        if self.ledger.overridden(state) {
            return BTreeSet::new();
        }
        state.blocked_features.clone()
    }
}
