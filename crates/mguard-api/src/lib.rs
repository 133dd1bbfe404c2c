//! # mguard-api — Axum API Surface for the Merchant Guard Stack
//!
//! The read/evaluate/override surface consumed by the dashboard and the
//! external scheduler. No business logic lives in route handlers — they
//! delegate to the gate and baseline engines and map domain errors to
//! structured HTTP responses.
//!
//! ## API Surface
//!
//! | Method | Path                                                   | Domain |
//! |--------|--------------------------------------------------------|--------|
//! | GET    | `/v1/merchants/{merchant_id}/gates`                    | Gates  |
//! | GET    | `/v1/merchants/{merchant_id}/gates/{gate_type}`        | Gates  |
//! | POST   | `/v1/merchants/{merchant_id}/gates/{gate_type}/evaluate` | Gates |
//! | POST   | `/v1/merchants/{merchant_id}/gates/{gate_type}/override` | Gates |
//! | GET    | `/v1/merchants/{merchant_id}/baseline`                 | Baselines |
//! | POST   | `/v1/merchants/{merchant_id}/baseline/recalculate`     | Baselines |
//! | GET    | `/v1/merchants/{merchant_id}/revenue/comparison`       | Baselines |
//!
//! Health probes (`/health/*`) are mounted outside the traced API router
//! so they stay quiet and credential-free.
//!
//! ## Read Semantics
//!
//! Gate reads resolve grace expiry lazily ([`mguard_gate::GateState::effective_status`]),
//! report override-adjusted effective blocking, and always carry
//! `last_evaluated_at` so consumers can distinguish stale from fresh. A
//! gate is never shown "crashed": when an evaluation fails transiently the
//! handler falls back to the last persisted record.

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::gates::router())
        .merge(routes::baselines::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// GET /health/liveness — process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — engines are wired and answering.
async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    // The engines are synchronous and in-process; reachable means ready.
    let gates_configured = state.gates.thresholds().configured_gates().count();
    Json(serde_json::json!({
        "status": "ready",
        "gates_configured": gates_configured,
    }))
}
