//! # Baseline Engine Errors
//!
//! Input-data conditions (empty history, sparse day-of-week groups) are
//! not errors — the calculator absorbs them into provisional baselines.
//! What remains is the reader boundary and foundational-type failures.

use mguard_core::MerchantId;
use thiserror::Error;

/// Errors that can occur inside the baseline engine.
#[derive(Error, Debug)]
pub enum BaselineError {
    /// The order-history reader failed to produce the requested window.
    #[error("order history read failed for {merchant}: {reason}")]
    Reader {
        /// The merchant whose history was requested.
        merchant: MerchantId,
        /// The reader's failure description.
        reason: String,
    },

    /// No baseline has been calculated for the merchant yet.
    #[error("no baseline calculated for {0}")]
    NoBaseline(MerchantId),

    /// Error bubbled up from the foundational types.
    #[error(transparent)]
    Core(#[from] mguard_core::MguardError),
}
