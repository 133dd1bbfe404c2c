//! # Gate State Store — Keyed, Versioned Persistence Seam
//!
//! The persistence boundary for gate state. The engine reads the prior
//! record and writes the next one through this trait; durable backends are
//! the external collaborator's concern. The in-memory implementation backs
//! the API server, the CLI, and tests.
//!
//! ## Contract
//!
//! - At most one live record per `(merchant, gate_type)` key; writes
//!   replace wholesale.
//! - `put` carries the version the writer read (`None` for a first
//!   write). A mismatch is a lost-update race and must be rejected, never
//!   silently merged.
//! - Records are deleted only when the merchant itself is removed.

use dashmap::DashMap;

use mguard_core::{GateType, MerchantId};

use crate::error::GateError;
use crate::state::GateState;

/// Keyed storage for [`GateState`] records.
pub trait GateStateStore: Send + Sync {
    /// The live record for a merchant/gate pair, if any.
    fn get(&self, merchant_id: &MerchantId, gate_type: GateType) -> Option<GateState>;

    /// Replace the record for the state's key.
    ///
    /// `expected_version` is the version of the record the writer read
    /// (`None` when it read no record). On mismatch the store returns
    /// [`GateError::Conflict`] and leaves the stored record untouched.
    fn put(&self, state: GateState, expected_version: Option<u64>) -> Result<(), GateError>;

    /// All live records for one merchant, in gate-type order.
    fn list_for(&self, merchant_id: &MerchantId) -> Vec<GateState>;

    /// Remove every record for a merchant. Returns how many were removed.
    fn remove_merchant(&self, merchant_id: &MerchantId) -> usize;
}

/// In-memory [`GateStateStore`] over a concurrent keyed map.
#[derive(Debug, Default)]
pub struct InMemoryGateStore {
    records: DashMap<(MerchantId, GateType), GateState>,
}

impl InMemoryGateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of live records across all merchants.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GateStateStore for InMemoryGateStore {
    fn get(&self, merchant_id: &MerchantId, gate_type: GateType) -> Option<GateState> {
        self.records
            .get(&(merchant_id.clone(), gate_type))
            .map(|r| r.value().clone())
    }

    fn put(&self, state: GateState, expected_version: Option<u64>) -> Result<(), GateError> {
        let key = (state.merchant_id.clone(), state.gate_type);
        // The entry handle holds the shard lock, making the
        // compare-and-replace atomic with respect to other writers.
        let entry = self.records.entry(key);
        match entry {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                if Some(occupied.get().version) != expected_version {
                    return Err(GateError::Conflict {
                        merchant: state.merchant_id,
                        gate: state.gate_type,
                    });
                }
                occupied.insert(state);
                Ok(())
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                if expected_version.is_some() {
                    return Err(GateError::Conflict {
                        merchant: state.merchant_id,
                        gate: state.gate_type,
                    });
                }
                vacant.insert(state);
                Ok(())
            }
        }
    }

    fn list_for(&self, merchant_id: &MerchantId) -> Vec<GateState> {
        let mut states: Vec<GateState> = self
            .records
            .iter()
            .filter(|r| &r.key().0 == merchant_id)
            .map(|r| r.value().clone())
            .collect();
        states.sort_by_key(|s| s.gate_type);
        states
    }

    fn remove_merchant(&self, merchant_id: &MerchantId) -> usize {
        let before = self.records.len();
        self.records.retain(|k, _| &k.0 != merchant_id);
        before - self.records.len()
    }
}
