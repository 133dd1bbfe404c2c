//! # Gate Routes
//!
//! Gate state reads, evaluation ingestion, and override recording.
//!
//! ## Endpoints
//!
//! - `GET  /v1/merchants/{merchant_id}/gates` — all gate states for a merchant
//! - `GET  /v1/merchants/{merchant_id}/gates/{gate_type}` — one gate state
//! - `POST /v1/merchants/{merchant_id}/gates/{gate_type}/evaluate` — run an
//!   evaluation over a metric snapshot
//! - `POST /v1/merchants/{merchant_id}/gates/{gate_type}/override` — record
//!   a manual override in the append-only ledger

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use mguard_core::{ActorId, GateType, MerchantId, Timestamp};
use mguard_gate::{GateError, GateState, MetricSnapshot};

use crate::error::AppError;
use crate::state::AppState;

/// A gate state as served to consumers.
///
/// `status` and `blocked_features` are the *effective* values: grace
/// expiry is resolved lazily against the request time, and an override
/// within the current failing episode empties the blocked set.
#[derive(Debug, Serialize, Deserialize)]
pub struct GateStateResponse {
    /// The merchant the gate belongs to.
    pub merchant_id: String,
    /// The gate type.
    pub gate_type: String,
    /// Effective status as of the request time.
    pub status: String,
    /// Human-readable explanation from the last evaluation.
    pub message: String,
    /// The metric snapshot that produced the status.
    pub metrics: MetricSnapshot,
    /// Effective blocked features (override-adjusted).
    pub blocked_features: Vec<String>,
    /// Whether a ledger override is suppressing blocking right now.
    pub overridden: bool,
    /// Grace-period expiry, when one is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_ends_at: Option<String>,
    /// When the producing evaluation ran. Consumers compare this against
    /// their own freshness expectations to spot stale records.
    pub last_evaluated_at: String,
}

impl GateStateResponse {
    fn from_state(state: &AppState, record: &GateState, now: Timestamp) -> Self {
        let effective = record.effective_status(now);
        let overridden = effective.is_blocking() && state.gates.ledger().overridden(record);
        let blocked: Vec<String> = state
            .gates
            .effective_blocked_features(record, now)
            .iter()
            .map(|f| f.as_str().to_string())
            .collect();
        Self {
            merchant_id: record.merchant_id.as_uuid().to_string(),
            gate_type: record.gate_type.as_str().to_string(),
            status: effective.as_str().to_string(),
            message: record.message.clone(),
            metrics: record.metrics.clone(),
            blocked_features: blocked,
            overridden,
            grace_period_ends_at: record.grace_period_ends_at.map(|t| t.to_iso8601()),
            last_evaluated_at: record.last_evaluated_at.to_iso8601(),
        }
    }
}

/// Request body for recording an override.
#[derive(Debug, Serialize, Deserialize)]
pub struct OverrideRequest {
    /// The human actor making the call (SSO subject or staff email).
    pub actor_id: String,
    /// Why the gate is being overridden.
    pub reason: String,
}

/// Acknowledgement returned after an override is appended.
#[derive(Debug, Serialize, Deserialize)]
pub struct OverrideResponse {
    /// The merchant whose gate was overridden.
    pub merchant_id: String,
    /// The overridden gate.
    pub gate_type: String,
    /// The recording actor.
    pub actor_id: String,
    /// When the ledger accepted the entry.
    pub recorded_at: String,
}

/// The gates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/merchants/{merchant_id}/gates", get(list_gates))
        .route("/v1/merchants/{merchant_id}/gates/{gate_type}", get(get_gate))
        .route(
            "/v1/merchants/{merchant_id}/gates/{gate_type}/evaluate",
            post(evaluate_gate),
        )
        .route(
            "/v1/merchants/{merchant_id}/gates/{gate_type}/override",
            post(record_override),
        )
}

fn parse_merchant(s: &str) -> Result<MerchantId, AppError> {
    Ok(MerchantId::parse(s)?)
}

fn parse_gate(s: &str) -> Result<GateType, AppError> {
    Ok(s.parse::<GateType>()?)
}

/// GET /v1/merchants/{merchant_id}/gates
async fn list_gates(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Vec<GateStateResponse>>, AppError> {
    let merchant = parse_merchant(&merchant_id)?;
    let now = Timestamp::now();
    let responses = state
        .gates
        .merchant_states(&merchant)
        .iter()
        .map(|record| GateStateResponse::from_state(&state, record, now))
        .collect();
    Ok(Json(responses))
}

/// GET /v1/merchants/{merchant_id}/gates/{gate_type}
async fn get_gate(
    State(state): State<AppState>,
    Path((merchant_id, gate_type)): Path<(String, String)>,
) -> Result<Json<GateStateResponse>, AppError> {
    let merchant = parse_merchant(&merchant_id)?;
    let gate = parse_gate(&gate_type)?;
    let record = state
        .gates
        .gate_state(&merchant, gate)
        .ok_or_else(|| AppError::NotFound(format!("no gate state for {merchant}/{gate}")))?;
    Ok(Json(GateStateResponse::from_state(&state, &record, Timestamp::now())))
}

/// POST /v1/merchants/{merchant_id}/gates/{gate_type}/evaluate
///
/// Runs the evaluation synchronously and returns the fresh state. When
/// the write loses its race even after the engine's retry, the handler
/// falls back to the last persisted record — consumers see an older
/// `last_evaluated_at`, never an empty response for a known gate.
async fn evaluate_gate(
    State(state): State<AppState>,
    Path((merchant_id, gate_type)): Path<(String, String)>,
    Json(snapshot): Json<MetricSnapshot>,
) -> Result<Json<GateStateResponse>, AppError> {
    let merchant = parse_merchant(&merchant_id)?;
    let gate = parse_gate(&gate_type)?;
    let now = Timestamp::now();

    match state.gates.evaluate_at(merchant.clone(), gate, &snapshot, now) {
        Ok(record) => Ok(Json(GateStateResponse::from_state(&state, &record, now))),
        Err(GateError::Conflict { .. }) => {
            tracing::warn!(merchant = %merchant, gate = %gate, "evaluation conflict, serving last persisted state");
            match state.gates.gate_state(&merchant, gate) {
                Some(record) => Ok(Json(GateStateResponse::from_state(&state, &record, now))),
                None => Err(AppError::Conflict(format!(
                    "evaluation raced and no prior state exists for {merchant}/{gate}"
                ))),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /v1/merchants/{merchant_id}/gates/{gate_type}/override
async fn record_override(
    State(state): State<AppState>,
    Path((merchant_id, gate_type)): Path<(String, String)>,
    Json(body): Json<OverrideRequest>,
) -> Result<Json<OverrideResponse>, AppError> {
    let merchant = parse_merchant(&merchant_id)?;
    let gate = parse_gate(&gate_type)?;
    let actor = ActorId::new(body.actor_id)?;
    if body.reason.trim().is_empty() {
        return Err(AppError::Validation("override reason must not be empty".into()));
    }

    let entry = state
        .gates
        .record_override(merchant, gate, actor, body.reason);
    Ok(Json(OverrideResponse {
        merchant_id: entry.merchant_id.as_uuid().to_string(),
        gate_type: entry.gate_type.as_str().to_string(),
        actor_id: entry.actor.as_str().to_string(),
        recorded_at: entry.recorded_at.to_iso8601(),
    }))
}
