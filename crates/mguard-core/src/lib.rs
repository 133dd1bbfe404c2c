//! # mguard-core — Foundational Types for the Merchant Guard Stack
//!
//! This crate is the bedrock of the Merchant Guard Stack. It defines the
//! type-system primitives shared by the gate and baseline engines. Every
//! other crate in the workspace depends on `mguard-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `MerchantId` and `ActorId`
//!    are newtypes with explicit constructors. No bare strings or UUIDs for
//!    identifiers.
//!
//! 2. **Single `GateType` enum.** One definition, five variants, exhaustive
//!    `match` everywhere. Adding a gate type forces every consumer to handle
//!    it at compile time.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so persisted records and API responses
//!    always agree on a single rendering of an instant.
//!
//! 4. **`GateStatus` is a tagged variant type, not an ordering.** `warning`
//!    and `grace_period` are deliberately not comparable; the only question
//!    a caller may ask is [`GateStatus::is_blocking()`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mguard-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod feature;
pub mod gate;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::MguardError;
pub use feature::Feature;
pub use gate::{GateStatus, GateType, GATE_TYPE_COUNT};
pub use identity::{ActorId, MerchantId};
pub use temporal::Timestamp;
