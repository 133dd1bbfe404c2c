//! # Error Types — Structured Error Hierarchy
//!
//! Defines the shared error type used throughout the Merchant Guard Stack.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! The taxonomy follows the three failure classes the engines distinguish:
//!
//! - *Input data errors* (missing metric fields, empty order history) are
//!   recovered locally by the engines and never reach this type.
//! - *Configuration errors* (unknown gate type, unconfigured gate) surface
//!   as `Validation` / `UnknownGateType` — they indicate a caller bug.
//! - *Concurrency conflicts* surface as `Conflict` after the engine's
//!   single retry is exhausted.

use thiserror::Error;

/// Top-level error type for the Merchant Guard Stack.
#[derive(Error, Debug)]
pub enum MguardError {
    /// A caller supplied an identifier or payload that fails validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A gate type name that is not part of the taxonomy.
    #[error("unknown gate type: {0:?}")]
    UnknownGateType(String),

    /// A gate type with no entry in the active threshold table.
    #[error("no thresholds configured for gate type: {0}")]
    UnconfiguredGate(String),

    /// A lost-update race on a keyed record, surfaced after retry.
    #[error("concurrent modification conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
