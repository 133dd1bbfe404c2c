//! Router-level integration tests: each test drives the assembled app
//! through `tower::ServiceExt::oneshot` with no network listener.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mguard_api::{app, AppState};
use mguard_baseline::{
    BaselineCalculator, BaselineEngine, DailyRevenue, InMemoryBaselineStore, InMemoryOrderHistory,
};
use mguard_core::MerchantId;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn failing_snapshot() -> serde_json::Value {
    serde_json::json!({
        "rates": {
            "hard_bounce_rate": 0.007,
            "soft_bounce_rate": 0.012,
            "spam_complaint_rate": 0.0005
        },
        "counters": { "emails_sent": 1000 }
    })
}

fn healthy_snapshot() -> serde_json::Value {
    serde_json::json!({
        "rates": {
            "hard_bounce_rate": 0.001,
            "soft_bounce_rate": 0.012,
            "spam_complaint_rate": 0.0002
        }
    })
}

// ── Health ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_probes_answer_without_auth() {
    let app = app(AppState::in_memory());

    let response = app.clone().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["gates_configured"], 5);
}

// ── Gates ────────────────────────────────────────────────────────────

#[tokio::test]
async fn evaluate_then_read_gate_state() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    // Evaluation over a failing snapshot opens a grace window.
    let response = app
        .clone()
        .oneshot(post_json(&format!("{base}/gates/deliverability/evaluate"), failing_snapshot()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "grace_period");
    assert_eq!(json["blocked_features"], serde_json::json!(["promotions", "broadcasts"]));
    assert_eq!(json["overridden"], false);
    assert!(json["grace_period_ends_at"].is_string());
    assert!(json["message"].as_str().unwrap().contains("hard_bounce_rate at 0.70%"));

    // The read endpoints serve the persisted record.
    let response = app
        .clone()
        .oneshot(get(&format!("{base}/gates/deliverability")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "grace_period");

    let response = app.oneshot(get(&format!("{base}/gates"))).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn override_suppresses_blocking_without_touching_status() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    app.clone()
        .oneshot(post_json(&format!("{base}/gates/deliverability/evaluate"), failing_snapshot()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("{base}/gates/deliverability/override"),
            serde_json::json!({
                "actor_id": "ops@example.com",
                "reason": "Bounce source removed; cleared to resume"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["actor_id"], "ops@example.com");

    let response = app
        .oneshot(get(&format!("{base}/gates/deliverability")))
        .await
        .unwrap();
    let json = body_json(response).await;
    // Status is untouched; effective blocking is suppressed.
    assert_eq!(json["status"], "grace_period");
    assert_eq!(json["overridden"], true);
    assert_eq!(json["blocked_features"], serde_json::json!([]));
}

#[tokio::test]
async fn recovery_clears_blocking_in_one_evaluation() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    app.clone()
        .oneshot(post_json(&format!("{base}/gates/deliverability/evaluate"), failing_snapshot()))
        .await
        .unwrap();
    let response = app
        .oneshot(post_json(&format!("{base}/gates/deliverability/evaluate"), healthy_snapshot()))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "pass");
    assert_eq!(json["blocked_features"], serde_json::json!([]));
    assert!(json["grace_period_ends_at"].is_null() || json.get("grace_period_ends_at").is_none());
}

#[tokio::test]
async fn unknown_gate_type_is_rejected() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let response = app
        .oneshot(get(&format!("/v1/merchants/{}/gates/frobnicate", merchant.as_uuid())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"]["message"].as_str().unwrap().contains("unknown gate type"));
}

#[tokio::test]
async fn malformed_merchant_id_is_rejected() {
    let app = app(AppState::in_memory());
    let response = app
        .oneshot(get("/v1/merchants/not-a-uuid/gates"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unevaluated_gate_reads_not_found() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let response = app
        .oneshot(get(&format!("/v1/merchants/{}/gates/deliverability", merchant.as_uuid())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── Baselines ────────────────────────────────────────────────────────

fn state_with_history(merchant: &MerchantId, revenue: f64) -> AppState {
    let history = InMemoryOrderHistory::new();
    let today = chrono::Utc::now().date_naive();
    history.set(
        merchant.clone(),
        (1..=90)
            .map(|back| DailyRevenue { date: today - chrono::Duration::days(back), revenue })
            .collect(),
    );
    let in_memory = AppState::in_memory();
    let baselines = BaselineEngine::new(
        Arc::new(history),
        Arc::new(InMemoryBaselineStore::new()),
        BaselineCalculator::default(),
    );
    AppState::new(in_memory.gates, Arc::new(baselines))
}

#[tokio::test]
async fn baseline_recalculate_and_read() {
    let merchant = MerchantId::new();
    let app = app(state_with_history(&merchant, 6000.0));
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    // Nothing stored yet.
    let response = app.clone().oneshot(get(&format!("{base}/baseline"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Recalculate, then read.
    let response = app
        .clone()
        .oneshot(post_json(&format!("{base}/baseline/recalculate"), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data_points_used"], 90);
    assert_eq!(json["is_provisional"], false);
    assert_eq!(json["anomalies_excluded"], 0);
    for dow in 0..7 {
        assert_eq!(json["baseline_by_dow"][dow], 6000.0);
    }

    let response = app.oneshot(get(&format!("{base}/baseline"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn comparison_reports_lift() {
    let merchant = MerchantId::new();
    let app = app(state_with_history(&merchant, 6000.0));
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    app.clone()
        .oneshot(post_json(&format!("{base}/baseline/recalculate"), serde_json::json!({})))
        .await
        .unwrap();

    let today = chrono::Utc::now().date_naive();
    let response = app
        .oneshot(get(&format!("{base}/revenue/comparison?date={today}&actual=7200")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["expected_revenue"], 6000.0);
    assert_eq!(json["lift_percent"], 20.0);
    assert_eq!(json["is_provisional"], false);
}

#[tokio::test]
async fn comparison_without_baseline_is_not_found() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let response = app
        .oneshot(get(&format!(
            "/v1/merchants/{}/revenue/comparison?date=2026-08-06&actual=7200",
            merchant.as_uuid()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_history_recalculation_is_provisional_with_null_lift() {
    let app = app(AppState::in_memory());
    let merchant = MerchantId::new();
    let base = format!("/v1/merchants/{}", merchant.as_uuid());

    let response = app
        .clone()
        .oneshot(post_json(&format!("{base}/baseline/recalculate"), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_provisional"], true);
    assert_eq!(json["data_points_used"], 0);

    let response = app
        .oneshot(get(&format!("{base}/revenue/comparison?date=2026-08-06&actual=1234")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["lift_percent"].is_null());
    assert_eq!(json["is_provisional"], true);
}
