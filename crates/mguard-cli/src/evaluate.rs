//! # `mguard evaluate` — One-Shot Gate Evaluation
//!
//! Evaluates a single gate from a metric snapshot file, optionally
//! against a prior persisted state, and prints the resulting state as
//! pretty JSON. The same pure evaluation path the engine runs — useful
//! for reproducing a merchant's gate decision from exported data.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use mguard_core::{GateType, MerchantId};
use mguard_gate::{evaluate_gate, GateState, MetricSnapshot, ThresholdTable};

use crate::{read_file, resolve_clock};

/// Arguments for `mguard evaluate`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Merchant UUID the evaluation belongs to.
    #[arg(long)]
    pub merchant: String,

    /// Gate type to evaluate (e.g. `deliverability`).
    #[arg(long)]
    pub gate: String,

    /// Path to the metric snapshot JSON file.
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Path to the prior persisted gate state JSON, when one exists.
    #[arg(long)]
    pub prior: Option<PathBuf>,

    /// Threshold table YAML overriding the stock configuration.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Evaluation clock as UTC ISO8601 (`2026-08-06T12:00:00Z`).
    /// Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Run the evaluation and print the resulting state.
pub fn run_evaluate(args: &EvaluateArgs) -> anyhow::Result<u8> {
    let merchant = MerchantId::parse(&args.merchant)?;
    let gate = GateType::from_str(&args.gate)?;
    let now = resolve_clock(args.at.as_deref())?;

    let table = match &args.thresholds {
        Some(path) => ThresholdTable::from_yaml(&read_file(path)?)?,
        None => ThresholdTable::default(),
    };
    let thresholds = table.get(gate)?;

    let snapshot: MetricSnapshot = serde_json::from_str(&read_file(&args.snapshot)?)?;
    let prior: Option<GateState> = match &args.prior {
        Some(path) => Some(serde_json::from_str(&read_file(path)?)?),
        None => None,
    };

    let state = evaluate_gate(merchant, gate, thresholds, &snapshot, prior.as_ref(), now);
    tracing::debug!(status = %state.status, "evaluation complete");
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use mguard_core::GateStatus;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn args(dir: &tempfile::TempDir, snapshot: &str) -> EvaluateArgs {
        EvaluateArgs {
            merchant: MerchantId::new().as_uuid().to_string(),
            gate: "deliverability".to_string(),
            snapshot: write(dir, "snap.json", snapshot),
            prior: None,
            thresholds: None,
            at: Some("2026-08-06T12:00:00Z".to_string()),
        }
    }

    #[test]
    fn evaluate_healthy_snapshot_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(
            &dir,
            r#"{"rates":{"hard_bounce_rate":0.001,"soft_bounce_rate":0.01,"spam_complaint_rate":0.0002}}"#,
        );
        assert_eq!(run_evaluate(&args).unwrap(), 0);
    }

    #[test]
    fn evaluate_with_prior_state_keeps_grace_window() {
        let dir = tempfile::tempdir().unwrap();
        let failing = r#"{"rates":{"hard_bounce_rate":0.007}}"#;
        let mut args = args(&dir, failing);

        // Derive a prior state from a first evaluation, persist it to a
        // file, and feed it back in.
        let merchant = MerchantId::parse(&args.merchant).unwrap();
        let table = ThresholdTable::default();
        let thresholds = table.get(GateType::Deliverability).unwrap();
        let snapshot: MetricSnapshot = serde_json::from_str(failing).unwrap();
        let first = evaluate_gate(
            merchant,
            GateType::Deliverability,
            thresholds,
            &snapshot,
            None,
            mguard_core::Timestamp::parse("2026-08-06T12:00:00Z").unwrap(),
        );
        assert_eq!(first.status, GateStatus::GracePeriod);
        args.prior = Some(write(&dir, "prior.json", &serde_json::to_string(&first).unwrap()));
        args.at = Some("2026-08-07T12:00:00Z".to_string());

        assert_eq!(run_evaluate(&args).unwrap(), 0);
    }

    #[test]
    fn evaluate_rejects_unknown_gate() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&dir, r#"{"rates":{}}"#);
        args.gate = "frobnicate".to_string();
        assert!(run_evaluate(&args).is_err());
    }

    #[test]
    fn evaluate_rejects_missing_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&dir, "{}");
        args.snapshot = dir.path().join("missing.json");
        assert!(run_evaluate(&args).is_err());
    }
}
