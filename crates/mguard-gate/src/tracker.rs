//! # Grace Period Tracker
//!
//! The state machine wrapped around the evaluator's candidate status. It
//! converts a transient fail into a temporary grace window before features
//! hard-block, and resolves expiry.
//!
//! ## States and Transitions
//!
//! ```text
//! PASS / WARNING ──fail detected──▶ FAIL_GRACE(now + window)
//!       ▲                               │
//!       │         still failing,        │ still failing,
//!       │         now < expiry          │ now >= expiry
//!       │              │                ▼
//!       │              └──▶ FAIL_GRACE (unchanged) ──▶ FAIL_BLOCKED
//!       │                                                  │
//!       └──────────── metrics recover ◀───────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Expiry is fixed at first detection. Repeated failing evaluations keep
//!   the original expiry — re-deriving it each time would let a
//!   continuously-failing merchant stay in grace forever.
//! - Recovery is immediate. A pass or warning evaluation clears the grace
//!   window and the failing episode outright; there is no hysteresis on
//!   the way up.
//! - `failing_since` marks the first detection of the current episode and
//!   survives the grace → blocked transition. The override ledger uses it
//!   to scope overrides to the episode.

use mguard_core::{GateStatus, Timestamp};

use crate::state::GateState;

/// The evaluator's pre-grace-period verdict over a snapshot.
///
/// `GracePeriod` is never a candidate — it only arises from this tracker's
/// resolution of a `Fail` against the prior record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Every classified metric is below its warning threshold.
    Pass,
    /// At least one metric is in its warning band, none failing.
    Warning,
    /// At least one metric is at/above its fail threshold.
    Fail,
}

/// The tracker's resolution of a candidate against the prior record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The status to persist.
    pub status: GateStatus,
    /// Grace expiry to persist (`Some` iff status is `grace_period`).
    pub grace_period_ends_at: Option<Timestamp>,
    /// First detection of the current failing episode (`Some` iff the
    /// status is blocking).
    pub failing_since: Option<Timestamp>,
}

/// Advance the state machine one evaluation step.
///
/// `prior` is the persisted record from the previous evaluation, if any;
/// `grace_hours` comes from the gate's threshold configuration.
pub fn advance(
    prior: Option<&GateState>,
    candidate: Candidate,
    now: Timestamp,
    grace_hours: i64,
) -> Resolution {
    match candidate {
        Candidate::Pass => Resolution {
            status: GateStatus::Pass,
            grace_period_ends_at: None,
            failing_since: None,
        },
        Candidate::Warning => Resolution {
            status: GateStatus::Warning,
            grace_period_ends_at: None,
            failing_since: None,
        },
        Candidate::Fail => resolve_failing(prior, now, grace_hours),
    }
}

/// Resolve a failing candidate against the prior record.
fn resolve_failing(prior: Option<&GateState>, now: Timestamp, grace_hours: i64) -> Resolution {
    let prior_blocking = prior.filter(|p| p.status.is_blocking());

    match prior_blocking {
        // Continuing episode with a live grace window: keep the original
        // expiry while it holds, harden to FAIL once it has passed.
        Some(p) if p.status == GateStatus::GracePeriod => {
            let ends_at = p
                .grace_period_ends_at
                // A stored grace record without an expiry violates the
                // invariant; restart the window rather than block abruptly.
                .unwrap_or_else(|| now.plus_hours(grace_hours));
            let failing_since = p.failing_since.or(Some(now));
            if now < ends_at {
                Resolution {
                    status: GateStatus::GracePeriod,
                    grace_period_ends_at: Some(ends_at),
                    failing_since,
                }
            } else {
                Resolution {
                    status: GateStatus::Fail,
                    grace_period_ends_at: None,
                    failing_since,
                }
            }
        }
        // Already hard-blocked: stay blocked, keep the episode start.
        Some(p) => Resolution {
            status: GateStatus::Fail,
            grace_period_ends_at: None,
            failing_since: p.failing_since.or(Some(now)),
        },
        // Fresh episode: open a new grace window anchored at detection.
        None => Resolution {
            status: GateStatus::GracePeriod,
            grace_period_ends_at: Some(now.plus_hours(grace_hours)),
            failing_since: Some(now),
        },
    }
}
