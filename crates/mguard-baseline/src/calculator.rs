//! # Baseline Calculator
//!
//! Turns a merchant's order history into an expected-revenue-by-day-of-week
//! profile:
//!
//! 1. Sum revenue rows into one total per calendar date.
//! 2. Group daily totals by day of week (0 = Sunday … 6 = Saturday).
//! 3. Within each group, exclude anomalous points via the configured
//!    [`OutlierDetector`], recording how many were excluded.
//! 4. Average the remaining points into the group's expected revenue.
//! 5. Flag the whole baseline provisional when any group has fewer
//!    non-anomalous points than the minimum sample count.
//!
//! A merchant with zero usable history gets an all-zero provisional
//! baseline — merchants legitimately start with no orders, and the
//! calculation job must not fail for them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use mguard_core::{MerchantId, Timestamp};

use crate::anomaly::{MadOutlierDetector, OutlierDetector};
use crate::revenue::DailyRevenue;

/// Day-of-week index with 0 = Sunday, matching the dashboard's week
/// rendering and the comparison consumers.
pub fn day_of_week_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// A merchant's expected-revenue profile, one record per merchant.
///
/// Created or overwritten wholesale on each recalculation; never partially
/// updated, so a stale profile can never mix with a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// The merchant this profile belongs to.
    pub merchant_id: MerchantId,
    /// Expected revenue by day of week, index 0 = Sunday.
    pub by_dow: [f64; 7],
    /// Length of the lookback window the profile was computed over.
    pub lookback_days: u32,
    /// Non-anomalous daily totals used across all groups.
    pub data_points_used: u32,
    /// Daily totals excluded as anomalous across all groups.
    pub anomalies_excluded: u32,
    /// True when any day-of-week group fell below the minimum sample
    /// count — the profile is usable but not yet trustworthy.
    pub is_provisional: bool,
    /// When the profile was calculated.
    pub calculated_at: Timestamp,
}

impl Baseline {
    /// Expected revenue for a calendar date (by its day of week).
    pub fn expected_for(&self, date: NaiveDate) -> f64 {
        self.by_dow[day_of_week_index(date)]
    }
}

/// The baseline calculation job's configuration.
#[derive(Debug)]
pub struct BaselineCalculator {
    lookback_days: u32,
    min_samples_per_dow: usize,
    detector: Box<dyn OutlierDetector>,
}

impl Default for BaselineCalculator {
    /// 90-day lookback, two full cycles per day of week, median/MAD
    /// detection.
    fn default() -> Self {
        Self {
            lookback_days: 90,
            min_samples_per_dow: 2,
            detector: Box::new(MadOutlierDetector::default()),
        }
    }
}

impl BaselineCalculator {
    /// A calculator with an explicit lookback window.
    pub fn with_lookback(lookback_days: u32) -> Self {
        Self {
            lookback_days: lookback_days.max(1),
            ..Self::default()
        }
    }

    /// Replace the outlier detector.
    pub fn with_detector(mut self, detector: Box<dyn OutlierDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// The configured lookback window length in days.
    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// First date (inclusive) of the window ending just before `now`.
    ///
    /// The window excludes the current date — today's revenue is still
    /// accumulating and would bias its day-of-week group low.
    pub fn window_start(&self, now: Timestamp) -> NaiveDate {
        self.window_end(now) - chrono::Duration::days(i64::from(self.lookback_days))
    }

    /// End date (exclusive) of the window: the current UTC date.
    pub fn window_end(&self, now: Timestamp) -> NaiveDate {
        now.as_datetime().date_naive()
    }

    /// Compute a merchant's baseline from revenue rows.
    ///
    /// Rows outside the lookback window (and any row dated `now` or
    /// later) are ignored, so callers may hand over a full export.
    pub fn calculate(&self, merchant_id: MerchantId, rows: &[DailyRevenue], now: Timestamp) -> Baseline {
        let since = self.window_start(now);
        let until = self.window_end(now);

        // One total per calendar date inside the window.
        let mut daily: std::collections::BTreeMap<NaiveDate, f64> = std::collections::BTreeMap::new();
        for row in rows {
            if row.date >= since && row.date < until && row.revenue.is_finite() {
                *daily.entry(row.date).or_insert(0.0) += row.revenue;
            }
        }

        let mut groups: [Vec<f64>; 7] = Default::default();
        for (date, total) in &daily {
            groups[day_of_week_index(*date)].push(*total);
        }

        let mut by_dow = [0.0f64; 7];
        let mut used: u32 = 0;
        let mut excluded: u32 = 0;
        let mut provisional = false;

        for (dow, group) in groups.iter().enumerate() {
            let part = self.detector.partition(group);
            excluded += part.excluded as u32;
            used += part.kept.len() as u32;
            if part.kept.len() < self.min_samples_per_dow {
                provisional = true;
            }
            if !part.kept.is_empty() {
                by_dow[dow] = part.kept.iter().sum::<f64>() / part.kept.len() as f64;
            }
        }

        if daily.is_empty() {
            tracing::debug!(merchant = %merchant_id, "no usable order history, zero baseline");
        }

        Baseline {
            merchant_id,
            by_dow,
            lookback_days: self.lookback_days,
            data_points_used: used,
            anomalies_excluded: excluded,
            is_provisional: provisional,
            calculated_at: now,
        }
    }
}
