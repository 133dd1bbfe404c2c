//! # Baseline Routes
//!
//! Baseline reads, recalculation, and the revenue comparison query.
//!
//! ## Endpoints
//!
//! - `GET  /v1/merchants/{merchant_id}/baseline` — the stored profile
//! - `POST /v1/merchants/{merchant_id}/baseline/recalculate` — rebuild it
//!   from the order history window
//! - `GET  /v1/merchants/{merchant_id}/revenue/comparison?date=&actual=` —
//!   expected vs actual with lift

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mguard_baseline::{Baseline, RevenueComparison};
use mguard_core::MerchantId;

use crate::error::AppError;
use crate::state::AppState;

/// A baseline profile as served to consumers.
#[derive(Debug, Serialize, Deserialize)]
pub struct BaselineResponse {
    /// The merchant the profile belongs to.
    pub merchant_id: String,
    /// Expected revenue by day of week, index 0 = Sunday.
    pub baseline_by_dow: [f64; 7],
    /// Lookback window length the profile was computed over.
    pub lookback_days: u32,
    /// Non-anomalous daily totals used.
    pub data_points_used: u32,
    /// Daily totals excluded as anomalous.
    pub anomalies_excluded: u32,
    /// Whether the profile is still below the minimum sample count.
    pub is_provisional: bool,
    /// When the profile was calculated.
    pub calculated_at: String,
}

impl From<Baseline> for BaselineResponse {
    fn from(b: Baseline) -> Self {
        Self {
            merchant_id: b.merchant_id.as_uuid().to_string(),
            baseline_by_dow: b.by_dow,
            lookback_days: b.lookback_days,
            data_points_used: b.data_points_used,
            anomalies_excluded: b.anomalies_excluded,
            is_provisional: b.is_provisional,
            calculated_at: b.calculated_at.to_iso8601(),
        }
    }
}

/// Query parameters for the comparison endpoint.
#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    /// The calendar date to compare (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// The actual revenue observed for that date.
    pub actual: f64,
}

/// The baselines router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/merchants/{merchant_id}/baseline", get(get_baseline))
        .route(
            "/v1/merchants/{merchant_id}/baseline/recalculate",
            post(recalculate_baseline),
        )
        .route(
            "/v1/merchants/{merchant_id}/revenue/comparison",
            get(revenue_comparison),
        )
}

/// GET /v1/merchants/{merchant_id}/baseline
async fn get_baseline(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<BaselineResponse>, AppError> {
    let merchant = MerchantId::parse(&merchant_id)?;
    let baseline = state
        .baselines
        .baseline(&merchant)
        .ok_or_else(|| AppError::NotFound(format!("no baseline calculated for {merchant}")))?;
    Ok(Json(baseline.into()))
}

/// POST /v1/merchants/{merchant_id}/baseline/recalculate
async fn recalculate_baseline(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<BaselineResponse>, AppError> {
    let merchant = MerchantId::parse(&merchant_id)?;
    let baseline = state.baselines.recalculate(merchant)?;
    Ok(Json(baseline.into()))
}

/// GET /v1/merchants/{merchant_id}/revenue/comparison?date=&actual=
async fn revenue_comparison(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Query(query): Query<ComparisonQuery>,
) -> Result<Json<RevenueComparison>, AppError> {
    let merchant = MerchantId::parse(&merchant_id)?;
    if !query.actual.is_finite() {
        return Err(AppError::Validation("actual revenue must be finite".into()));
    }
    let comparison = state.baselines.comparison(&merchant, query.date, query.actual)?;
    Ok(Json(comparison))
}
