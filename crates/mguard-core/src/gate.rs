//! # Gate Taxonomy — Single Source of Truth
//!
//! Defines the `GateType` enum with all five marketing-safety gates and the
//! `GateStatus` enum for their evaluation outcomes. These are the ONE
//! definition used across the entire stack. Every `match` on `GateType`
//! must be exhaustive — adding a gate forces every consumer to handle it
//! at compile time.
//!
//! ## Status Semantics
//!
//! `GateStatus` has no total severity order. `warning` and `grace_period`
//! are not comparable: a warning gate blocks nothing, while a grace-period
//! gate is already blocking with a remediation window running. The only
//! cross-status question callers may ask is [`GateStatus::is_blocking()`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MguardError;

/// All marketing-safety gate types.
///
/// Each gate type owns its own threshold set and metric shape. The
/// evaluator is data-driven over the threshold table — no per-type control
/// flow exists anywhere in the engine.
///
/// # Gates
///
/// | # | Gate | Guards |
/// |---|------|--------|
/// | 1 | Deliverability | Bounce/spam rates before any sending feature |
/// | 2 | FunnelThroughput | Storefront funnel drop-off before promotions |
/// | 3 | CroReview | Landing-page quality before offer experiments |
/// | 4 | OfferValidation | Refund/chargeback health of running offers |
/// | 5 | PaidAcquisition | Paid-spend efficiency before ad campaigns |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateType {
    /// Email deliverability health (bounce and spam-complaint rates).
    Deliverability,
    /// Storefront funnel throughput (drop-off between funnel stages).
    FunnelThroughput,
    /// Conversion-rate-optimization review of landing experiences.
    CroReview,
    /// Validation of live offers (refund and chargeback rates).
    OfferValidation,
    /// Paid acquisition efficiency (unprofitable spend share).
    PaidAcquisition,
}

/// Total number of gate types. Used for compile-time assertions.
pub const GATE_TYPE_COUNT: usize = 5;

impl GateType {
    /// Returns all five gate types in canonical order.
    pub fn all() -> &'static [GateType] {
        &[
            Self::Deliverability,
            Self::FunnelThroughput,
            Self::CroReview,
            Self::OfferValidation,
            Self::PaidAcquisition,
        ]
    }

    /// Returns the snake_case string identifier for this gate type.
    ///
    /// This must match the serde serialization format and the identifiers
    /// accepted in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deliverability => "deliverability",
            Self::FunnelThroughput => "funnel_throughput",
            Self::CroReview => "cro_review",
            Self::OfferValidation => "offer_validation",
            Self::PaidAcquisition => "paid_acquisition",
        }
    }
}

impl std::fmt::Display for GateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateType {
    type Err = MguardError;

    /// Parse a gate type from its snake_case string identifier.
    ///
    /// An unknown name is a caller/config bug, not a data condition, and is
    /// rejected with [`MguardError::UnknownGateType`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deliverability" => Ok(Self::Deliverability),
            "funnel_throughput" => Ok(Self::FunnelThroughput),
            "cro_review" => Ok(Self::CroReview),
            "offer_validation" => Ok(Self::OfferValidation),
            "paid_acquisition" => Ok(Self::PaidAcquisition),
            other => Err(MguardError::UnknownGateType(other.to_string())),
        }
    }
}

/// The evaluation outcome of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Every metric is below its warning threshold.
    Pass,
    /// At least one metric is in its warning band; nothing is blocked.
    Warning,
    /// A fail-level breach whose grace period has expired (or never ran).
    Fail,
    /// A fail-level breach inside its remediation window. Blocking is in
    /// effect; the expiry is fixed at first detection.
    GracePeriod,
}

impl GateStatus {
    /// Whether feature blocking is in effect or imminent for this status.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Fail | Self::GracePeriod)
    }

    /// Returns the snake_case string identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Fail => "fail",
            Self::GracePeriod => "grace_period",
        }
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
