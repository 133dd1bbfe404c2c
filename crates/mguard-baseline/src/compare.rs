//! # Revenue Comparison — Expected vs Actual
//!
//! The query the API layer answers for the dashboard's lift widgets:
//! given a date and the actual revenue observed, how does it compare to
//! the baseline's expectation for that day of week?
//!
//! Lift is `(actual − expected) / expected × 100`. An expected value of
//! zero makes lift undefined; the comparison reports `None` (serialized
//! as `null`) rather than NaN or infinity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculator::Baseline;

/// The result of comparing one day's actual revenue to the baseline.
///
/// Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueComparison {
    /// The date compared.
    pub date: NaiveDate,
    /// The actual revenue supplied by the caller.
    pub actual_revenue: f64,
    /// The baseline expectation for that date's day of week.
    pub expected_revenue: f64,
    /// Percentage lift over the expectation; `None` when the expectation
    /// is zero (lift is undefined, not infinite).
    pub lift_percent: Option<f64>,
    /// Carried from the baseline: the expectation is not yet trustworthy.
    pub is_provisional: bool,
}

/// Compare one day's actual revenue against the baseline.
pub fn compare(baseline: &Baseline, date: NaiveDate, actual_revenue: f64) -> RevenueComparison {
    let expected_revenue = baseline.expected_for(date);
    let lift_percent = if expected_revenue == 0.0 {
        None
    } else {
        Some((actual_revenue - expected_revenue) / expected_revenue * 100.0)
    };
    RevenueComparison {
        date,
        actual_revenue,
        expected_revenue,
        lift_percent,
        is_provisional: baseline.is_provisional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mguard_core::{MerchantId, Timestamp};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn baseline(by_dow: [f64; 7], provisional: bool) -> Baseline {
        Baseline {
            merchant_id: MerchantId::new(),
            by_dow,
            lookback_days: 90,
            data_points_used: 90,
            anomalies_excluded: 0,
            is_provisional: provisional,
            calculated_at: Timestamp::parse("2026-08-06T12:00:00Z").unwrap(),
        }
    }

    #[test]
    fn test_lift_twenty_percent() {
        let b = baseline([6000.0; 7], false);
        let cmp = compare(&b, d("2026-08-05"), 7200.0);
        assert_eq!(cmp.expected_revenue, 6000.0);
        assert_eq!(cmp.lift_percent, Some(20.0));
        assert!(!cmp.is_provisional);
    }

    #[test]
    fn test_negative_lift() {
        let b = baseline([6000.0; 7], false);
        let cmp = compare(&b, d("2026-08-05"), 4500.0);
        assert_eq!(cmp.lift_percent, Some(-25.0));
    }

    #[test]
    fn test_zero_expected_reports_null_lift() {
        let b = baseline([0.0; 7], true);
        let cmp = compare(&b, d("2026-08-05"), 1234.0);
        assert_eq!(cmp.lift_percent, None);
        assert!(cmp.is_provisional);
        // Serializes as null, not NaN.
        let json = serde_json::to_value(&cmp).unwrap();
        assert!(json["lift_percent"].is_null());
    }

    #[test]
    fn test_expectation_follows_day_of_week() {
        let mut by_dow = [1000.0; 7];
        by_dow[0] = 2000.0; // Sundays run hot
        let b = baseline(by_dow, false);
        assert_eq!(compare(&b, d("2026-08-09"), 2000.0).lift_percent, Some(0.0)); // Sunday
        assert_eq!(compare(&b, d("2026-08-10"), 2000.0).lift_percent, Some(100.0)); // Monday
    }

    #[test]
    fn test_provisional_flag_carries_through() {
        let b = baseline([6000.0; 7], true);
        assert!(compare(&b, d("2026-08-05"), 6000.0).is_provisional);
    }
}
