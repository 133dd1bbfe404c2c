//! # Gate Evaluator
//!
//! Classifies each metric in a snapshot independently against its
//! threshold entry, aggregates the worst class into a candidate status,
//! hands the candidate to the grace-period tracker, and composes the
//! human-readable evaluation message.
//!
//! ## Classification
//!
//! Per metric: `ok` below the warning level, `warning` at/above warning
//! and below fail, `fail` at/above the fail level. A metric with no
//! warning tier skips straight from `ok` to `fail`. A metric missing from
//! the snapshot (or carrying a non-finite value) classifies as `unknown`:
//! it is excluded from aggregation and flagged in the message — a sparse
//! snapshot degrades the explanation, never the job.
//!
//! ## Display Counts
//!
//! Counts in messages (e.g. "about 7 hard bounces") are derived as
//! `round(volume × rate)` for display only. Classification operates on
//! rates alone.

use mguard_core::{GateStatus, GateType, MerchantId, Timestamp};

use crate::snapshot::MetricSnapshot;
use crate::state::GateState;
use crate::thresholds::{GateThresholds, MetricThreshold};
use crate::tracker::{self, Candidate};

/// The classification of a single metric against its threshold entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricClass {
    /// Below the warning level (or below fail, for fail-only metrics).
    Ok,
    /// At/above warning and below fail.
    Warning,
    /// At/above the fail level.
    Fail,
    /// Missing from the snapshot or non-finite; excluded from aggregation.
    Unknown,
}

/// One metric's value and classification, retained for message rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// The metric key.
    pub metric: String,
    /// The snapshot value, when present and finite.
    pub value: Option<f64>,
    /// Warning level from the threshold entry.
    pub warning: Option<f64>,
    /// Fail level from the threshold entry.
    pub fail: f64,
    /// The resulting class.
    pub class: MetricClass,
}

/// Classify one metric value against its threshold entry.
pub fn classify(value: Option<f64>, threshold: &MetricThreshold) -> MetricClass {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return MetricClass::Unknown;
    };
    if v >= threshold.fail {
        return MetricClass::Fail;
    }
    match threshold.warning {
        Some(w) if v >= w => MetricClass::Warning,
        _ => MetricClass::Ok,
    }
}

/// Evaluate one gate for one merchant against a metric snapshot.
///
/// Pure computation over already-fetched data: the snapshot and the prior
/// persisted record go in, the next record comes out. The caller
/// ([`crate::engine::GateEngine`]) owns locking and the versioned write.
pub fn evaluate_gate(
    merchant_id: MerchantId,
    gate_type: GateType,
    thresholds: &GateThresholds,
    snapshot: &MetricSnapshot,
    prior: Option<&GateState>,
    now: Timestamp,
) -> GateState {
    let readings: Vec<MetricReading> = thresholds
        .metrics
        .iter()
        .map(|t| MetricReading {
            metric: t.metric.clone(),
            value: snapshot.rate(&t.metric).filter(|v| v.is_finite()),
            warning: t.warning,
            fail: t.fail,
            class: classify(snapshot.rate(&t.metric), t),
        })
        .collect();

    let candidate = aggregate(&readings);

    match candidate {
        Some(candidate) => {
            let resolution = tracker::advance(prior, candidate, now, thresholds.grace_period_hours);
            let blocked_features = if resolution.status.is_blocking() {
                thresholds.blocked_features.clone()
            } else {
                Default::default()
            };
            let message = compose_message(
                gate_type,
                &readings,
                resolution.status,
                resolution.grace_period_ends_at,
                &blocked_features,
                thresholds,
                snapshot,
                now,
            );
            GateState {
                merchant_id,
                gate_type,
                status: resolution.status,
                message,
                metrics: snapshot.clone(),
                blocked_features,
                grace_period_ends_at: resolution.grace_period_ends_at,
                failing_since: resolution.failing_since,
                last_evaluated_at: now,
                version: prior.map(|p| p.version + 1).unwrap_or(1),
            }
        }
        // Nothing classifiable: an input-data condition, not a failure.
        // Keep the prior verdict (or report pass for a first evaluation)
        // and say why.
        None => {
            let mut message = String::from("Snapshot carried no classifiable metrics for this gate.");
            for r in &readings {
                message.push(' ');
                message.push_str(&format!(
                    "Metric {} missing from snapshot; excluded from evaluation.",
                    r.metric
                ));
            }
            match prior {
                Some(p) => GateState {
                    message: format!("{message} Prior status retained."),
                    metrics: snapshot.clone(),
                    last_evaluated_at: now,
                    version: p.version + 1,
                    ..p.clone()
                },
                None => GateState {
                    merchant_id,
                    gate_type,
                    status: GateStatus::Pass,
                    message,
                    metrics: snapshot.clone(),
                    blocked_features: Default::default(),
                    grace_period_ends_at: None,
                    failing_since: None,
                    last_evaluated_at: now,
                    version: 1,
                },
            }
        }
    }
}

/// Worst-of aggregation over the classified readings.
///
/// Returns `None` when no reading was classifiable.
fn aggregate(readings: &[MetricReading]) -> Option<Candidate> {
    let mut any_known = false;
    let mut worst = Candidate::Pass;
    for r in readings {
        match r.class {
            MetricClass::Fail => return Some(Candidate::Fail),
            MetricClass::Warning => {
                any_known = true;
                worst = Candidate::Warning;
            }
            MetricClass::Ok => any_known = true,
            MetricClass::Unknown => {}
        }
    }
    any_known.then_some(worst)
}

// ─── Message Composition ─────────────────────────────────────────────

/// Render a rate as a two-decimal percentage.
fn format_pct(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// "hard_bounce_rate" → "hard bounces" (display label for derived counts).
fn count_label(metric: &str) -> String {
    let base = metric.strip_suffix("_rate").unwrap_or(metric);
    let mut label = base.replace('_', " ");
    if !label.ends_with('s') {
        label.push('s');
    }
    label
}

/// "emails_sent" → "emails sent".
fn counter_label(counter: &str) -> String {
    counter.replace('_', " ")
}

/// Derived display count: `round(volume × rate)`, when the gate names a
/// volume counter and the snapshot carries it. Never used to classify.
fn derived_count(
    reading: &MetricReading,
    thresholds: &GateThresholds,
    snapshot: &MetricSnapshot,
) -> Option<(u64, u64, String)> {
    let counter_key = thresholds.volume_counter.as_deref()?;
    let volume = snapshot.counter(counter_key)?;
    let rate = reading.value?;
    let count = (volume as f64 * rate).round() as u64;
    Some((count, volume, counter_label(counter_key)))
}

#[allow(clippy::too_many_arguments)]
fn compose_message(
    gate_type: GateType,
    readings: &[MetricReading],
    status: GateStatus,
    grace_period_ends_at: Option<Timestamp>,
    blocked_features: &std::collections::BTreeSet<mguard_core::Feature>,
    thresholds: &GateThresholds,
    snapshot: &MetricSnapshot,
    now: Timestamp,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    match status {
        GateStatus::Pass => {
            parts.push(format!("All {gate_type} metrics within healthy ranges."));
        }
        GateStatus::Warning => {
            for r in readings.iter().filter(|r| r.class == MetricClass::Warning) {
                let (Some(v), Some(w)) = (r.value, r.warning) else { continue };
                parts.push(format!(
                    "{} at {} is above its warning threshold of {} (fail at {}).",
                    r.metric,
                    format_pct(v),
                    format_pct(w),
                    format_pct(r.fail),
                ));
            }
        }
        GateStatus::Fail | GateStatus::GracePeriod => {
            for r in readings.iter().filter(|r| r.class == MetricClass::Fail) {
                let Some(v) = r.value else { continue };
                let count_phrase = derived_count(r, thresholds, snapshot)
                    .map(|(count, volume, counter)| {
                        format!(" (about {count} {} of {volume} {counter})", count_label(&r.metric))
                    })
                    .unwrap_or_default();
                parts.push(format!(
                    "{} at {} is at or above its fail threshold of {}{}.",
                    r.metric,
                    format_pct(v),
                    format_pct(r.fail),
                    count_phrase,
                ));
            }
        }
    }

    match (status, grace_period_ends_at) {
        (GateStatus::GracePeriod, Some(ends_at)) => {
            let secs = now.seconds_until(&ends_at).max(0);
            parts.push(format!(
                "Grace period ends {} ({}h {}m remaining).",
                ends_at.to_iso8601(),
                secs / 3600,
                (secs % 3600) / 60,
            ));
        }
        (GateStatus::Fail, _) => {
            parts.push("Grace period expired; feature blocking is in effect.".to_string());
        }
        _ => {}
    }

    if !blocked_features.is_empty() {
        let names: Vec<&str> = blocked_features.iter().map(|f| f.as_str()).collect();
        parts.push(format!("Blocked features: {}.", names.join(", ")));
    }

    for r in readings.iter().filter(|r| r.class == MetricClass::Unknown) {
        parts.push(format!(
            "Metric {} missing from snapshot; excluded from evaluation.",
            r.metric
        ));
    }

    parts.join(" ")
}
