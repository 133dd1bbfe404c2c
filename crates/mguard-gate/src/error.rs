//! # Gate Engine Errors

use mguard_core::{GateType, MerchantId};
use thiserror::Error;

/// Errors that can occur inside the gate engine.
#[derive(Error, Debug)]
pub enum GateError {
    /// The active threshold table has no entry for the requested gate.
    /// This is a configuration bug, not a data condition.
    #[error("no thresholds configured for gate type {0}")]
    Unconfigured(GateType),

    /// A threshold entry fails validation (e.g., warning >= fail).
    #[error("invalid threshold for {gate}/{metric}: {reason}")]
    InvalidThreshold {
        /// The gate the entry belongs to.
        gate: GateType,
        /// The metric key within the gate.
        metric: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// A lost-update race on a gate-state write, surfaced after the
    /// engine's single retry was also beaten to the write.
    #[error("concurrent gate-state write for {merchant}/{gate}")]
    Conflict {
        /// The merchant whose record raced.
        merchant: MerchantId,
        /// The gate type whose record raced.
        gate: GateType,
    },

    /// Threshold configuration could not be parsed.
    #[error("threshold config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Error bubbled up from the foundational types.
    #[error(transparent)]
    Core(#[from] mguard_core::MguardError),
}
