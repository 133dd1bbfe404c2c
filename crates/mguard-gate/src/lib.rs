//! # mguard-gate — Deliverability Gate Engine
//!
//! Decides, per merchant and per gate type, whether marketing-sending
//! features are safe to use. The pipeline is:
//!
//! ```text
//! MetricSnapshot ──▶ evaluator (classify + aggregate)
//!                        │
//!                        ▼
//!                 tracker (grace-period state machine)
//!                        │
//!                        ▼
//!                 GateState ──▶ GateStateStore (keyed, versioned)
//!                        ▲
//!                        └── OverrideLedger (consulted, never mutating)
//! ```
//!
//! ## Modules
//!
//! - **`thresholds`**: static per-gate configuration (warning/fail levels,
//!   grace window, blocked feature set). Pure data — the evaluator never
//!   branches on gate type.
//! - **`snapshot`**: the metric snapshot boundary contract (named rates as
//!   decimal fractions plus raw counters for message formatting).
//! - **`evaluator`**: per-metric classification, worst-of aggregation, and
//!   human-readable message composition.
//! - **`tracker`**: the PASS/WARNING/FAIL_GRACE/FAIL_BLOCKED state machine.
//!   Grace expiry is fixed at first detection and never extended by
//!   repeated failures.
//! - **`state`**: the persisted `GateState` record and its invariants.
//! - **`ledger`**: append-only audit of manual overrides.
//! - **`store`**: keyed `(merchant, gate_type)` store with optimistic
//!   version checking.
//! - **`engine`**: job orchestrator — per-key serialization, retry-once
//!   conflict handling, decision-point tracing.
//!
//! ## Concurrency Model
//!
//! Evaluation jobs are discrete and synchronous. Different merchants, and
//! different gate types of one merchant, may be evaluated in parallel.
//! Re-evaluation of the same `(merchant, gate_type)` pair is serialized by
//! a per-key lock inside [`engine::GateEngine`]; the store's version check
//! guards against writers outside the engine. Jobs are short and
//! idempotent over an unchanged snapshot, so a scheduler that times one
//! out can simply retry on its next cycle.

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod thresholds;
pub mod tracker;

pub use engine::GateEngine;
pub use error::GateError;
pub use evaluator::{classify, evaluate_gate, MetricClass, MetricReading};
pub use ledger::{GateOverride, OverrideLedger};
pub use snapshot::MetricSnapshot;
pub use state::GateState;
pub use store::{GateStateStore, InMemoryGateStore};
pub use thresholds::{GateThresholds, MetricThreshold, ThresholdTable};
