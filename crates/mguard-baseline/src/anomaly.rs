//! # Anomaly Detection — Robust Outlier Exclusion
//!
//! Before a day-of-week group is averaged, anomalous data points are
//! excluded so that one viral spike or one flash-sale day does not
//! permanently inflate "normal". The test is swappable behind
//! [`OutlierDetector`]; the default is a median/MAD modified z-score,
//! robust against the right-skew that single large orders put into
//! revenue distributions (mean/stddev would let the outlier drag the
//! center toward itself and mask its own exclusion).

use serde::{Deserialize, Serialize};

/// Consistency scale relating MAD to the standard deviation of a normal
/// distribution (`sigma ≈ 1.4826 × MAD`).
pub const MAD_SCALE: f64 = 1.4826;

/// Floor applied to the scaled MAD so identical-valued groups do not
/// divide by zero. Relative to the median where the median is nonzero.
const MIN_MAD_EPSILON: f64 = 1e-9;

/// The result of partitioning one group of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Values retained for averaging, in input order.
    pub kept: Vec<f64>,
    /// Number of values excluded as anomalous.
    pub excluded: usize,
}

/// A swappable test deciding which values in a group are anomalous.
pub trait OutlierDetector: Send + Sync + std::fmt::Debug {
    /// Split a group into kept values and an excluded count.
    fn partition(&self, values: &[f64]) -> Partition;
}

/// Median/MAD modified z-score detector.
///
/// A point is anomalous when `|x − median| / (1.4826 × MAD)` exceeds the
/// threshold. The conventional threshold for this statistic is 3.5; lower
/// values exclude more aggressively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MadOutlierDetector {
    /// Modified z-score above which a point is excluded.
    pub threshold: f64,
}

impl MadOutlierDetector {
    /// A detector with an explicit threshold. Non-finite or non-positive
    /// thresholds are clamped to the conventional 3.5.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold
        } else {
            tracing::warn!(threshold, "invalid MAD threshold, using default 3.5");
            3.5
        };
        Self { threshold }
    }
}

impl Default for MadOutlierDetector {
    fn default() -> Self {
        Self { threshold: 3.5 }
    }
}

impl OutlierDetector for MadOutlierDetector {
    fn partition(&self, values: &[f64]) -> Partition {
        let Some(med) = median(values) else {
            return Partition { kept: Vec::new(), excluded: 0 };
        };

        let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
        let mad = median(&deviations).unwrap_or(0.0);
        let sigma = (mad * MAD_SCALE).max(MIN_MAD_EPSILON.max(med.abs() * MIN_MAD_EPSILON));

        let mut kept = Vec::with_capacity(values.len());
        let mut excluded = 0usize;
        for (v, dev) in values.iter().zip(&deviations) {
            if dev / sigma > self.threshold {
                excluded += 1;
            } else {
                kept.push(*v);
            }
        }
        Partition { kept, excluded }
    }
}

/// Median of a slice, or `None` when it is empty.
///
/// Even-length slices take the midpoint of the two central values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}
