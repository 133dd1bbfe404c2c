//! # Override Ledger — Append-Only Audit of Manual Unblocks
//!
//! Records every conscious human decision to treat a blocked gate as
//! non-blocking. The ledger is evidence, not state: entries are never
//! updated or deleted, and recording one does not touch the persisted
//! [`GateState`] — the consuming layer asks the ledger whether the current
//! failing episode has been overridden.
//!
//! ## Episode Scoping
//!
//! An override applies only to the failing episode it was recorded in. The
//! comparison is `recorded_at >= state.failing_since`: a fresh fail after
//! recovery starts a new episode with a later `failing_since`, so old
//! overrides stop matching without any mutation.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use mguard_core::{ActorId, GateType, MerchantId, Timestamp};

use crate::state::GateState;

/// One append-only audit record of a manual override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOverride {
    /// The merchant whose gate was overridden.
    pub merchant_id: MerchantId,
    /// The gate that was overridden.
    pub gate_type: GateType,
    /// The human who made the call.
    pub actor: ActorId,
    /// Why they made it.
    pub reason: String,
    /// When the override was recorded.
    pub recorded_at: Timestamp,
}

/// The append-only override ledger.
///
/// Interior mutability keeps the append path `&self` so the ledger can be
/// shared between the engine and the API layer behind one `Arc`.
#[derive(Debug, Default)]
pub struct OverrideLedger {
    entries: RwLock<Vec<GateOverride>>,
}

impl OverrideLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override record and return it.
    pub fn record(
        &self,
        merchant_id: MerchantId,
        gate_type: GateType,
        actor: ActorId,
        reason: impl Into<String>,
        recorded_at: Timestamp,
    ) -> GateOverride {
        let entry = GateOverride {
            merchant_id,
            gate_type,
            actor,
            reason: reason.into(),
            recorded_at,
        };
        tracing::info!(
            merchant = %entry.merchant_id,
            gate = %entry.gate_type,
            actor = %entry.actor,
            "gate override recorded"
        );
        self.entries.write().push(entry.clone());
        entry
    }

    /// All entries for one merchant/gate pair, oldest first.
    pub fn entries_for(&self, merchant_id: &MerchantId, gate_type: GateType) -> Vec<GateOverride> {
        self.entries
            .read()
            .iter()
            .filter(|e| &e.merchant_id == merchant_id && e.gate_type == gate_type)
            .cloned()
            .collect()
    }

    /// Total number of recorded overrides.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether the state's current failing episode has been overridden.
    ///
    /// Always false for non-blocking states — there is nothing to override.
    pub fn overridden(&self, state: &GateState) -> bool {
        let Some(failing_since) = state.failing_since else {
            return false;
        };
        if !state.status.is_blocking() {
            return false;
        }
        self.entries.read().iter().any(|e| {
            e.merchant_id == state.merchant_id
                && e.gate_type == state.gate_type
                && e.recorded_at >= failing_since
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use mguard_core::{Feature, GateStatus};

    use crate::snapshot::MetricSnapshot;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn actor() -> ActorId {
        ActorId::new("ops@example.com").unwrap()
    }

    fn blocked_state(merchant: MerchantId, failing_since: &str) -> GateState {
        GateState {
            merchant_id: merchant,
            gate_type: GateType::Deliverability,
            status: GateStatus::GracePeriod,
            message: String::new(),
            metrics: MetricSnapshot::new(),
            blocked_features: [Feature::Promotions].into(),
            grace_period_ends_at: Some(ts(failing_since).plus_hours(72)),
            failing_since: Some(ts(failing_since)),
            last_evaluated_at: ts(failing_since),
            version: 1,
        }
    }

    #[test]
    fn test_record_appends_and_returns_entry() {
        let ledger = OverrideLedger::new();
        let merchant = MerchantId::new();
        let entry = ledger.record(
            merchant.clone(),
            GateType::Deliverability,
            actor(),
            "List cleaned, resending validated segment",
            ts("2026-08-07T09:00:00Z"),
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(entry.reason, "List cleaned, resending validated segment");
        assert_eq!(ledger.entries_for(&merchant, GateType::Deliverability), vec![entry]);
    }

    #[test]
    fn test_entries_are_scoped_by_key() {
        let ledger = OverrideLedger::new();
        let a = MerchantId::new();
        let b = MerchantId::new();
        ledger.record(a.clone(), GateType::Deliverability, actor(), "a", ts("2026-08-07T09:00:00Z"));
        ledger.record(b.clone(), GateType::Deliverability, actor(), "b", ts("2026-08-07T09:00:00Z"));
        ledger.record(a.clone(), GateType::PaidAcquisition, actor(), "c", ts("2026-08-07T09:00:00Z"));

        assert_eq!(ledger.entries_for(&a, GateType::Deliverability).len(), 1);
        assert_eq!(ledger.entries_for(&b, GateType::Deliverability).len(), 1);
        assert_eq!(ledger.entries_for(&a, GateType::PaidAcquisition).len(), 1);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_override_applies_within_episode() {
        let ledger = OverrideLedger::new();
        let merchant = MerchantId::new();
        let state = blocked_state(merchant.clone(), "2026-08-06T12:00:00Z");

        assert!(!ledger.overridden(&state));
        ledger.record(
            merchant,
            GateType::Deliverability,
            actor(),
            "Bounce source identified and removed",
            ts("2026-08-07T09:00:00Z"),
        );
        assert!(ledger.overridden(&state));
    }

    #[test]
    fn test_override_from_past_episode_does_not_apply() {
        let ledger = OverrideLedger::new();
        let merchant = MerchantId::new();

        // Override recorded during an old episode...
        ledger.record(
            merchant.clone(),
            GateType::Deliverability,
            actor(),
            "old episode",
            ts("2026-07-01T09:00:00Z"),
        );

        // ...does not unblock a fresh episode that started later.
        let state = blocked_state(merchant, "2026-08-06T12:00:00Z");
        assert!(!ledger.overridden(&state));
    }

    #[test]
    fn test_override_ignores_other_gate() {
        let ledger = OverrideLedger::new();
        let merchant = MerchantId::new();
        ledger.record(
            merchant.clone(),
            GateType::PaidAcquisition,
            actor(),
            "different gate",
            ts("2026-08-07T09:00:00Z"),
        );
        let state = blocked_state(merchant, "2026-08-06T12:00:00Z");
        assert!(!ledger.overridden(&state));
    }

    #[test]
    fn test_non_blocking_state_is_never_overridden() {
        let ledger = OverrideLedger::new();
        let merchant = MerchantId::new();
        ledger.record(
            merchant.clone(),
            GateType::Deliverability,
            actor(),
            "noise",
            ts("2026-08-07T09:00:00Z"),
        );
        let mut state = blocked_state(merchant, "2026-08-06T12:00:00Z");
        state.status = GateStatus::Pass;
        state.blocked_features = BTreeSet::new();
        state.grace_period_ends_at = None;
        state.failing_since = None;
        assert!(!ledger.overridden(&state));
    }
}
