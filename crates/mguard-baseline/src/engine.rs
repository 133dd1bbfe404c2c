//! # Baseline Engine — Job Orchestrator
//!
//! Ties the order-history reader, the calculator, and the store together
//! into the unit the external scheduler invokes. Recalculation is a
//! discrete, synchronous job: read the window, compute, replace the
//! stored baseline wholesale. Merchants are independent — parallel
//! recalculation across merchants is safe.

use std::sync::Arc;

use chrono::NaiveDate;

use mguard_core::{MerchantId, Timestamp};

use crate::calculator::{Baseline, BaselineCalculator};
use crate::compare::{compare, RevenueComparison};
use crate::error::BaselineError;
use crate::revenue::OrderHistoryReader;
use crate::store::BaselineStore;

/// The baseline calculation engine for one deployment.
pub struct BaselineEngine {
    reader: Arc<dyn OrderHistoryReader>,
    store: Arc<dyn BaselineStore>,
    calculator: BaselineCalculator,
}

impl std::fmt::Debug for BaselineEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineEngine")
            .field("calculator", &self.calculator)
            .finish_non_exhaustive()
    }
}

impl BaselineEngine {
    /// Create an engine over a reader, a store, and a calculator.
    pub fn new(
        reader: Arc<dyn OrderHistoryReader>,
        store: Arc<dyn BaselineStore>,
        calculator: BaselineCalculator,
    ) -> Self {
        Self { reader, store, calculator }
    }

    /// The configured calculator.
    pub fn calculator(&self) -> &BaselineCalculator {
        &self.calculator
    }

    /// Recalculate and persist a merchant's baseline at the current time.
    pub fn recalculate(&self, merchant_id: MerchantId) -> Result<Baseline, BaselineError> {
        self.recalculate_at(merchant_id, Timestamp::now())
    }

    /// Recalculate and persist with an explicit clock.
    pub fn recalculate_at(
        &self,
        merchant_id: MerchantId,
        now: Timestamp,
    ) -> Result<Baseline, BaselineError> {
        let since = self.calculator.window_start(now);
        let until = self.calculator.window_end(now);
        let rows = self.reader.daily_revenue(&merchant_id, since, until)?;

        let baseline = self.calculator.calculate(merchant_id.clone(), &rows, now);
        tracing::info!(
            merchant = %merchant_id,
            used = baseline.data_points_used,
            excluded = baseline.anomalies_excluded,
            provisional = baseline.is_provisional,
            "baseline recalculated"
        );
        self.store.put(baseline.clone());
        Ok(baseline)
    }

    /// The stored baseline for a merchant, if any.
    pub fn baseline(&self, merchant_id: &MerchantId) -> Option<Baseline> {
        self.store.get(merchant_id)
    }

    /// Compare a day's actual revenue against the stored baseline.
    ///
    /// Fails with [`BaselineError::NoBaseline`] when the merchant has
    /// never been calculated — callers recalculate first.
    pub fn comparison(
        &self,
        merchant_id: &MerchantId,
        date: NaiveDate,
        actual_revenue: f64,
    ) -> Result<RevenueComparison, BaselineError> {
        let baseline = self
            .store
            .get(merchant_id)
            .ok_or_else(|| BaselineError::NoBaseline(merchant_id.clone()))?;
        Ok(compare(&baseline, date, actual_revenue))
    }

    /// Remove a merchant's baseline (merchant deletion only).
    pub fn remove_merchant(&self, merchant_id: &MerchantId) -> bool {
        self.store.remove(merchant_id)
    }
}
