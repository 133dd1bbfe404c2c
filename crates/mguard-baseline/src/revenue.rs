//! # Order History — Ingestion Boundary Contract
//!
//! The shape in which the external order store hands revenue history to
//! the calculator: an ordered sequence of `(date, revenue)` rows spanning
//! at least the requested lookback window. Where the rows come from
//! (order webhooks, nightly exports) is the collaborator's concern.

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use mguard_core::MerchantId;

use crate::error::BaselineError;

/// One day's revenue total for a merchant.
///
/// Multiple rows for the same calendar date are legal at the boundary;
/// the calculator sums them into one daily total before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// The calendar date (merchant-local day bucketing is the source's
    /// concern; this core treats the date as opaque).
    pub date: NaiveDate,
    /// Revenue for that date in the merchant's currency.
    pub revenue: f64,
}

/// The order-history seam the baseline engine reads through.
pub trait OrderHistoryReader: Send + Sync {
    /// Revenue rows for `merchant` with `since <= date < until`.
    fn daily_revenue(
        &self,
        merchant: &MerchantId,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<DailyRevenue>, BaselineError>;
}

/// In-memory [`OrderHistoryReader`] for the API server, the CLI, and tests.
#[derive(Debug, Default)]
pub struct InMemoryOrderHistory {
    rows: DashMap<MerchantId, Vec<DailyRevenue>>,
}

impl InMemoryOrderHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored rows for a merchant.
    pub fn set(&self, merchant: MerchantId, mut rows: Vec<DailyRevenue>) {
        rows.sort_by_key(|r| r.date);
        self.rows.insert(merchant, rows);
    }

    /// Append one row for a merchant.
    pub fn push(&self, merchant: MerchantId, row: DailyRevenue) {
        let mut entry = self.rows.entry(merchant).or_default();
        entry.push(row);
        entry.sort_by_key(|r| r.date);
    }
}

impl OrderHistoryReader for InMemoryOrderHistory {
    fn daily_revenue(
        &self,
        merchant: &MerchantId,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<DailyRevenue>, BaselineError> {
        Ok(self
            .rows
            .get(merchant)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.date >= since && r.date < until)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}
