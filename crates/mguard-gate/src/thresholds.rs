//! # Threshold Table — Static Per-Gate Configuration
//!
//! Maps each [`GateType`] to its tracked metrics (warning/fail boundaries),
//! grace-period duration, blocked feature set, and the volume counter used
//! for message formatting. The table is pure data: adding a gate type means
//! adding an entry here, never touching the evaluator's control flow.
//!
//! Rates are decimal fractions throughout (`0.003` = 0.3%).
//!
//! ## Configuration
//!
//! [`ThresholdTable::default()`] seeds the stock table below. Deployments
//! override it wholesale from YAML ([`ThresholdTable::from_yaml()`]);
//! per-merchant grace windows are applied by handing a merchant-specific
//! table to the engine, not by mutating a shared one.
//!
//! | gate | metric | warning | fail | grace |
//! |------|--------|---------|------|-------|
//! | deliverability | hard_bounce_rate | — | 0.5% | 72h |
//! | deliverability | soft_bounce_rate | 3% | 5% | 72h |
//! | deliverability | spam_complaint_rate | — | 0.1% | 72h |
//! | funnel_throughput | funnel_drop_off_rate | 70% | 85% | 48h |
//! | cro_review | landing_bounce_rate | 65% | 80% | 48h |
//! | offer_validation | offer_refund_rate | 5% | 10% | 24h |
//! | offer_validation | offer_chargeback_rate | — | 1% | 24h |
//! | paid_acquisition | unprofitable_spend_rate | 30% | 50% | 24h |

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use mguard_core::{Feature, GateType};

use crate::error::GateError;

/// Warning/fail boundaries for one tracked metric.
///
/// A metric with `warning: None` has no warning tier and skips straight
/// from `ok` to `fail` (hard bounces and spam complaints are like this —
/// there is no "slightly elevated" hard bounce rate worth tolerating).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    /// Snapshot key of the rate this entry classifies.
    pub metric: String,
    /// At/above this rate (and below `fail`) the metric is `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    /// At/above this rate the metric is `fail`.
    pub fail: f64,
}

impl MetricThreshold {
    /// A metric with both warning and fail tiers.
    pub fn tiered(metric: impl Into<String>, warning: f64, fail: f64) -> Self {
        Self {
            metric: metric.into(),
            warning: Some(warning),
            fail,
        }
    }

    /// A metric with no warning tier — `ok` below `fail`, `fail` at/above.
    pub fn fail_only(metric: impl Into<String>, fail: f64) -> Self {
        Self {
            metric: metric.into(),
            warning: None,
            fail,
        }
    }
}

/// The full threshold configuration for one gate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    /// Tracked metrics, each classified independently.
    pub metrics: Vec<MetricThreshold>,
    /// Remediation window granted on first fail detection.
    pub grace_period_hours: i64,
    /// Features switched off while this gate is `fail` or `grace_period`.
    pub blocked_features: BTreeSet<Feature>,
    /// Snapshot counter used to derive display counts from rates
    /// (e.g. `emails_sent` for the deliverability gate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_counter: Option<String>,
}

impl GateThresholds {
    /// Look up the threshold entry for a metric key.
    pub fn metric(&self, key: &str) -> Option<&MetricThreshold> {
        self.metrics.iter().find(|m| m.metric == key)
    }

    /// Validate the entry set for a gate.
    ///
    /// Rejects non-finite or non-positive fail levels, warning tiers at or
    /// above their fail level, non-positive grace windows, empty metric
    /// sets, and empty blocked-feature sets (a gate that blocks nothing on
    /// fail cannot uphold the blocking invariant).
    pub fn validate(&self, gate: GateType) -> Result<(), GateError> {
        if self.metrics.is_empty() {
            return Err(GateError::InvalidThreshold {
                gate,
                metric: "<none>".to_string(),
                reason: "gate has no tracked metrics".to_string(),
            });
        }
        if self.grace_period_hours <= 0 {
            return Err(GateError::InvalidThreshold {
                gate,
                metric: "<grace>".to_string(),
                reason: format!("grace_period_hours must be positive, got {}", self.grace_period_hours),
            });
        }
        if self.blocked_features.is_empty() {
            return Err(GateError::InvalidThreshold {
                gate,
                metric: "<features>".to_string(),
                reason: "blocked_features must not be empty".to_string(),
            });
        }
        for m in &self.metrics {
            if !m.fail.is_finite() || m.fail <= 0.0 {
                return Err(GateError::InvalidThreshold {
                    gate,
                    metric: m.metric.clone(),
                    reason: format!("fail level must be a positive finite rate, got {}", m.fail),
                });
            }
            if let Some(w) = m.warning {
                if !w.is_finite() || w <= 0.0 || w >= m.fail {
                    return Err(GateError::InvalidThreshold {
                        gate,
                        metric: m.metric.clone(),
                        reason: format!("warning level {w} must be positive and below fail level {}", m.fail),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The active threshold configuration: one entry per gate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    gates: BTreeMap<GateType, GateThresholds>,
}

impl ThresholdTable {
    /// An empty table. Useful as a base for fully custom configuration.
    pub fn empty() -> Self {
        Self { gates: BTreeMap::new() }
    }

    /// Thresholds for a gate, or [`GateError::Unconfigured`] when the
    /// active table has no entry for it.
    pub fn get(&self, gate: GateType) -> Result<&GateThresholds, GateError> {
        self.gates.get(&gate).ok_or(GateError::Unconfigured(gate))
    }

    /// Insert or replace the entry for a gate after validating it.
    pub fn insert(&mut self, gate: GateType, thresholds: GateThresholds) -> Result<(), GateError> {
        thresholds.validate(gate)?;
        self.gates.insert(gate, thresholds);
        Ok(())
    }

    /// Gate types with an entry in this table, in canonical order.
    pub fn configured_gates(&self) -> impl Iterator<Item = GateType> + '_ {
        self.gates.keys().copied()
    }

    /// Parse a table from YAML and validate every entry.
    pub fn from_yaml(s: &str) -> Result<Self, GateError> {
        let table: ThresholdTable = serde_yaml::from_str(s)?;
        for (gate, thresholds) in &table.gates {
            thresholds.validate(*gate)?;
        }
        Ok(table)
    }

    /// Render the table as YAML.
    pub fn to_yaml(&self) -> Result<String, GateError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for ThresholdTable {
    /// The stock table documented in the module header.
    fn default() -> Self {
        let mut gates = BTreeMap::new();

        gates.insert(
            GateType::Deliverability,
            GateThresholds {
                metrics: vec![
                    MetricThreshold::fail_only("hard_bounce_rate", 0.005),
                    MetricThreshold::tiered("soft_bounce_rate", 0.03, 0.05),
                    MetricThreshold::fail_only("spam_complaint_rate", 0.001),
                ],
                grace_period_hours: 72,
                blocked_features: [Feature::Promotions, Feature::Broadcasts].into(),
                volume_counter: Some("emails_sent".to_string()),
            },
        );

        gates.insert(
            GateType::FunnelThroughput,
            GateThresholds {
                metrics: vec![MetricThreshold::tiered("funnel_drop_off_rate", 0.70, 0.85)],
                grace_period_hours: 48,
                blocked_features: [Feature::Promotions].into(),
                volume_counter: Some("funnel_sessions".to_string()),
            },
        );

        gates.insert(
            GateType::CroReview,
            GateThresholds {
                metrics: vec![MetricThreshold::tiered("landing_bounce_rate", 0.65, 0.80)],
                grace_period_hours: 48,
                blocked_features: [Feature::OfferTests].into(),
                volume_counter: Some("landing_sessions".to_string()),
            },
        );

        gates.insert(
            GateType::OfferValidation,
            GateThresholds {
                metrics: vec![
                    MetricThreshold::tiered("offer_refund_rate", 0.05, 0.10),
                    MetricThreshold::fail_only("offer_chargeback_rate", 0.01),
                ],
                grace_period_hours: 24,
                blocked_features: [Feature::OfferTests].into(),
                volume_counter: Some("orders_placed".to_string()),
            },
        );

        gates.insert(
            GateType::PaidAcquisition,
            GateThresholds {
                metrics: vec![MetricThreshold::tiered("unprofitable_spend_rate", 0.30, 0.50)],
                grace_period_hours: 24,
                blocked_features: [Feature::PaidCampaigns].into(),
                volume_counter: None,
            },
        );

        Self { gates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_gate() {
        let table = ThresholdTable::default();
        for gate in GateType::all() {
            assert!(table.get(*gate).is_ok(), "missing entry for {gate}");
        }
    }

    #[test]
    fn test_default_table_validates() {
        let table = ThresholdTable::default();
        for gate in GateType::all() {
            table.get(*gate).unwrap().validate(*gate).unwrap();
        }
    }

    #[test]
    fn test_deliverability_levels() {
        let table = ThresholdTable::default();
        let d = table.get(GateType::Deliverability).unwrap();

        let hard = d.metric("hard_bounce_rate").unwrap();
        assert_eq!(hard.warning, None);
        assert_eq!(hard.fail, 0.005);

        let soft = d.metric("soft_bounce_rate").unwrap();
        assert_eq!(soft.warning, Some(0.03));
        assert_eq!(soft.fail, 0.05);

        let spam = d.metric("spam_complaint_rate").unwrap();
        assert_eq!(spam.warning, None);
        assert_eq!(spam.fail, 0.001);

        assert_eq!(d.grace_period_hours, 72);
        assert!(d.blocked_features.contains(&mguard_core::Feature::Promotions));
        assert!(d.blocked_features.contains(&mguard_core::Feature::Broadcasts));
        assert_eq!(d.volume_counter.as_deref(), Some("emails_sent"));
    }

    #[test]
    fn test_empty_table_is_unconfigured() {
        let table = ThresholdTable::empty();
        assert!(matches!(
            table.get(GateType::Deliverability),
            Err(GateError::Unconfigured(GateType::Deliverability))
        ));
    }

    #[test]
    fn test_insert_rejects_warning_at_fail() {
        let mut table = ThresholdTable::empty();
        let bad = GateThresholds {
            metrics: vec![MetricThreshold::tiered("rate", 0.05, 0.05)],
            grace_period_hours: 24,
            blocked_features: [Feature::Promotions].into(),
            volume_counter: None,
        };
        assert!(table.insert(GateType::Deliverability, bad).is_err());
    }

    #[test]
    fn test_insert_rejects_empty_metrics() {
        let mut table = ThresholdTable::empty();
        let bad = GateThresholds {
            metrics: vec![],
            grace_period_hours: 24,
            blocked_features: [Feature::Promotions].into(),
            volume_counter: None,
        };
        assert!(table.insert(GateType::Deliverability, bad).is_err());
    }

    #[test]
    fn test_insert_rejects_nonpositive_grace() {
        let mut table = ThresholdTable::empty();
        let bad = GateThresholds {
            metrics: vec![MetricThreshold::fail_only("rate", 0.01)],
            grace_period_hours: 0,
            blocked_features: [Feature::Promotions].into(),
            volume_counter: None,
        };
        assert!(table.insert(GateType::Deliverability, bad).is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let table = ThresholdTable::default();
        let yaml = table.to_yaml().unwrap();
        let parsed = ThresholdTable::from_yaml(&yaml).unwrap();
        assert_eq!(table, parsed);
    }

    #[test]
    fn test_from_yaml_rejects_invalid_entry() {
        // warning above fail must be rejected at load time.
        let yaml = r#"
gates:
  deliverability:
    metrics:
      - metric: hard_bounce_rate
        warning: 0.9
        fail: 0.005
    grace_period_hours: 72
    blocked_features: [promotions]
"#;
        assert!(ThresholdTable::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_grace_window_is_configuration() {
        // A deployment can shorten the deliverability window without code
        // changes; the engine reads whatever table it was handed.
        let mut table = ThresholdTable::default();
        let mut d = table.get(GateType::Deliverability).unwrap().clone();
        d.grace_period_hours = 12;
        table.insert(GateType::Deliverability, d).unwrap();
        assert_eq!(table.get(GateType::Deliverability).unwrap().grace_period_hours, 12);
    }
}
