//! # Baseline Store — Keyed Persistence Seam
//!
//! One baseline per merchant, replaced wholesale on every recalculation.
//! Durable backends are the external collaborator's concern; the
//! in-memory implementation backs the API server, the CLI, and tests.

use dashmap::DashMap;

use mguard_core::MerchantId;

use crate::calculator::Baseline;

/// Keyed storage for [`Baseline`] records.
pub trait BaselineStore: Send + Sync {
    /// The stored baseline for a merchant, if any.
    fn get(&self, merchant_id: &MerchantId) -> Option<Baseline>;

    /// Replace the merchant's baseline wholesale.
    fn put(&self, baseline: Baseline);

    /// Remove a merchant's baseline. Returns whether one existed.
    fn remove(&self, merchant_id: &MerchantId) -> bool;
}

/// In-memory [`BaselineStore`] over a concurrent keyed map.
#[derive(Debug, Default)]
pub struct InMemoryBaselineStore {
    records: DashMap<MerchantId, Baseline>,
}

impl InMemoryBaselineStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of merchants with a stored baseline.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no baselines.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BaselineStore for InMemoryBaselineStore {
    fn get(&self, merchant_id: &MerchantId) -> Option<Baseline> {
        self.records.get(merchant_id).map(|r| r.value().clone())
    }

    fn put(&self, baseline: Baseline) {
        self.records.insert(baseline.merchant_id.clone(), baseline);
    }

    fn remove(&self, merchant_id: &MerchantId) -> bool {
        self.records.remove(merchant_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mguard_core::Timestamp;

    fn baseline(merchant: &MerchantId, sunday: f64) -> Baseline {
        let mut by_dow = [1000.0; 7];
        by_dow[0] = sunday;
        Baseline {
            merchant_id: merchant.clone(),
            by_dow,
            lookback_days: 90,
            data_points_used: 90,
            anomalies_excluded: 0,
            is_provisional: false,
            calculated_at: Timestamp::parse("2026-08-06T12:00:00Z").unwrap(),
        }
    }

    #[test]
    fn test_put_and_get() {
        let store = InMemoryBaselineStore::new();
        let merchant = MerchantId::new();
        store.put(baseline(&merchant, 2000.0));
        assert_eq!(store.get(&merchant).unwrap().by_dow[0], 2000.0);
        assert!(store.get(&MerchantId::new()).is_none());
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let store = InMemoryBaselineStore::new();
        let merchant = MerchantId::new();
        store.put(baseline(&merchant, 2000.0));
        store.put(baseline(&merchant, 3000.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&merchant).unwrap().by_dow[0], 3000.0);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryBaselineStore::new();
        let merchant = MerchantId::new();
        store.put(baseline(&merchant, 2000.0));
        assert!(store.remove(&merchant));
        assert!(!store.remove(&merchant));
        assert!(store.is_empty());
    }
}
