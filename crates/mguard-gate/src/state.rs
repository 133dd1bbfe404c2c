//! # Gate State — The Persisted Evaluation Record
//!
//! One live record per `(merchant, gate_type)` key, overwritten wholesale
//! on every evaluation and deleted only when the merchant is removed. The
//! record is the sole carrier of state between evaluation jobs — the
//! grace-period machine reads the prior record and writes the next one.
//!
//! ## Invariants
//!
//! - `grace_period_ends_at` is `Some` if and only if status is
//!   `grace_period`.
//! - `blocked_features` is non-empty only when status is `fail` or
//!   `grace_period`.
//! - `failing_since` is `Some` if and only if status is `fail` or
//!   `grace_period`; it marks the first detection of the current failing
//!   episode and is what scopes overrides to that episode.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use mguard_core::{Feature, GateStatus, GateType, MerchantId, Timestamp};

use crate::snapshot::MetricSnapshot;

/// The current evaluation outcome for one merchant/gate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateState {
    /// The merchant this record belongs to.
    pub merchant_id: MerchantId,
    /// The gate this record describes.
    pub gate_type: GateType,
    /// Status produced by the most recent evaluation.
    pub status: GateStatus,
    /// Human-readable explanation of the status.
    pub message: String,
    /// The metric snapshot that produced the status.
    pub metrics: MetricSnapshot,
    /// Features currently blocked by this gate.
    pub blocked_features: BTreeSet<Feature>,
    /// When the running grace period expires. Set iff status is
    /// `grace_period`; fixed at first fail detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_ends_at: Option<Timestamp>,
    /// First detection time of the current failing episode. Set iff the
    /// status is blocking; cleared on recovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failing_since: Option<Timestamp>,
    /// When the evaluation that produced this record ran. Consumers use
    /// this to distinguish stale from fresh.
    pub last_evaluated_at: Timestamp,
    /// Optimistic-concurrency token, incremented on every write.
    pub version: u64,
}

impl GateState {
    /// The status as of `now`, resolving grace expiry lazily.
    ///
    /// A persisted `grace_period` whose expiry has passed reads as `fail`
    /// without waiting for the next scheduled evaluation.
    pub fn effective_status(&self, now: Timestamp) -> GateStatus {
        match (self.status, self.grace_period_ends_at) {
            (GateStatus::GracePeriod, Some(ends_at)) if now >= ends_at => GateStatus::Fail,
            (status, _) => status,
        }
    }

    /// Whether blocking is in effect as of `now` (before override
    /// consultation — see [`crate::ledger::OverrideLedger`]).
    pub fn is_blocking(&self, now: Timestamp) -> bool {
        self.effective_status(now).is_blocking()
    }

    /// Check the record's structural invariants.
    ///
    /// Evaluator output always satisfies these; the check exists for
    /// records arriving from external storage.
    pub fn check_invariants(&self) -> Result<(), String> {
        let blocking = self.status.is_blocking();
        if self.grace_period_ends_at.is_some() != (self.status == GateStatus::GracePeriod) {
            return Err(format!(
                "grace_period_ends_at presence does not match status {}",
                self.status
            ));
        }
        if !blocking && !self.blocked_features.is_empty() {
            return Err(format!("blocked_features set on non-blocking status {}", self.status));
        }
        if self.failing_since.is_some() != blocking {
            return Err(format!(
                "failing_since presence does not match status {}",
                self.status
            ));
        }
        Ok(())
    }
}
