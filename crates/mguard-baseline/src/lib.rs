//! # mguard-baseline — Revenue Baseline Engine
//!
//! Computes, per merchant, an expected-revenue-by-day-of-week profile from
//! historical order data, excluding statistical anomalies, and answers
//! "how did today compare to normal?" for the dashboard's lift widgets.
//!
//! ```text
//! OrderHistoryReader ──▶ calculator (group by dow, exclude outliers, mean)
//!                              │
//!                              ▼
//!                         Baseline ──▶ BaselineStore (wholesale replace)
//!                              │
//!                              ▼
//!                      comparison (expected vs actual → lift)
//! ```
//!
//! ## Modules
//!
//! - **`revenue`**: the `(date, revenue)` boundary contract and the
//!   `OrderHistoryReader` seam.
//! - **`anomaly`**: swappable outlier detection; the default is a
//!   median/MAD modified z-score test, chosen over mean/stddev because
//!   revenue distributions are routinely right-skewed by single large
//!   orders.
//! - **`calculator`**: grouping, exclusion, averaging, provisional
//!   flagging. Zero usable history produces an all-zero provisional
//!   baseline, never a job failure.
//! - **`compare`**: expected-vs-actual lift with a null sentinel instead
//!   of dividing by zero.
//! - **`store`**: keyed per-merchant baseline store (wholesale replace —
//!   stale baselines must never partially mix with new ones).
//! - **`engine`**: job orchestrator over the reader/calculator/store.

pub mod anomaly;
pub mod calculator;
pub mod compare;
pub mod engine;
pub mod error;
pub mod revenue;
pub mod store;

pub use anomaly::{MadOutlierDetector, OutlierDetector, Partition};
pub use calculator::{day_of_week_index, Baseline, BaselineCalculator};
pub use compare::{compare, RevenueComparison};
pub use engine::BaselineEngine;
pub use error::BaselineError;
pub use revenue::{DailyRevenue, InMemoryOrderHistory, OrderHistoryReader};
pub use store::{BaselineStore, InMemoryBaselineStore};
