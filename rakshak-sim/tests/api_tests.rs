//! Integration tests for rakshak-sim HTTP endpoints
//!
//! Each test gets a fresh in-memory store and drives the router with
//! `oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rakshak_sim::{build_router, db, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

async fn setup_app() -> Router {
    let pool = db::init_memory_pool().await.expect("memory pool");
    build_router(AppState::new(pool))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, value)
}

async fn seed_worker(app: &Router, id: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/workers",
        Some(json!({
            "worker_id": id,
            "name": "Ravi Kumar",
            "phone": "9876500000",
            "joined_at": "2024-01-10",
            "current_status": "active"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_banner_and_health() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rakshak-sim");
    assert!(body["version"].is_string());
}

// =============================================================================
// Workers
// =============================================================================

#[tokio::test]
async fn test_create_worker_statuses() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let (status, body) = send(&app, "POST", "/workers", Some(json!({"worker_id": "W1"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/workers", Some(json!({"name": "No Id"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/workers",
        Some(json!({"worker_id": "W2", "Bad Key": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Keys inside notes text follow the same rules
    let (status, body) = send(
        &app,
        "POST",
        "/workers",
        Some(json!({"worker_id": "W3", "name": "Asha", "notes": "{\"name\": \"Mallory\"}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("reserved"));
    let (status, _) = send(&app, "GET", "/workers/W3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/workers", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_unknown_worker() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let (status, body) = send(&app, "GET", "/workers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["worker_id"], "W1");

    let (status, body) = send(&app, "GET", "/workers/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);

    let (status, _) = send(&app, "DELETE", "/workers/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_worker_summary_collects_dependents() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "order_id": "O1",
            "worker_id": "W1",
            "order_date": "2025-01-01",
            "payout_amount": 120.5,
            "payment_compliant": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/termination_status",
        Some(json!({
            "worker_id": "W1",
            "is_terminated": true,
            "termination_reason_text": "Repeated late deliveries"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/termination_logs",
        Some(json!({"worker_id": "W1", "reason_code": "LATE", "severity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["log_id"].is_i64());

    let (status, _) = send(
        &app,
        "POST",
        "/review_counts",
        Some(json!({"worker_id": "W1", "count_5": 3, "count_1": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["worker"]["name"], "Ravi Kumar");
    assert_eq!(body["orders"][0]["order_id"], "O1");
    assert_eq!(body["orders"][0]["payment_compliant"], false);
    assert_eq!(body["termination_status"]["is_terminated"], true);
    assert_eq!(body["termination_logs"][0]["reason_code"], "LATE");
    assert_eq!(body["review_counts"]["total_reviews"], 5);
}

#[tokio::test]
async fn test_delete_worker_cascades() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;
    send(
        &app,
        "POST",
        "/orders",
        Some(json!({"order_id": "O1", "worker_id": "W1"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/termination_logs",
        Some(json!({"worker_id": "W1"})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, dump) = send(&app, "GET", "/db/print", None).await;
    assert!(dump["workers"].as_array().unwrap().is_empty());
    assert!(dump["orders"].as_array().unwrap().is_empty());
    assert!(dump["termination_logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_extension_fields() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let payouts = json!([{"amount": 500, "date": "2025-02-01"}]);
    let (status, _) = send(
        &app,
        "POST",
        "/workers/W1/fields",
        Some(json!({"op": "add", "field": "payouts", "value": payouts})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(body["worker"]["payouts"], payouts);

    let (status, _) = send(
        &app,
        "POST",
        "/workers/W1/fields",
        Some(json!({"op": "remove", "field": "payouts"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/workers/W1", None).await;
    assert!(body["worker"].get("payouts").is_none());

    // Removing an absent key on an existing worker is fine
    let (status, _) = send(
        &app,
        "POST",
        "/workers/W1/fields",
        Some(json!({"op": "remove", "field": "payouts"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/workers/W1/fields",
        Some(json!({"op": "rename", "field": "payouts"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/workers/W1/fields",
        Some(json!({"op": "add", "field": "name", "value": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/workers/NOPE/fields",
        Some(json!({"op": "add", "field": "payouts", "value": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Orders, termination, reviews
// =============================================================================

#[tokio::test]
async fn test_order_conflicts() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let order = json!({"order_id": "O1", "worker_id": "W1"});
    let (status, _) = send(&app, "POST", "/orders", Some(order.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/orders", Some(order)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({"order_id": "O2", "worker_id": "GHOST"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "POST", "/orders", Some(json!({"order_id": "O3"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("worker_id"));

    let (status, _) = send(&app, "DELETE", "/orders/O1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/orders/O1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dependents_require_existing_worker() {
    let app = setup_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/termination_status",
        Some(json!({"worker_id": "GHOST", "is_terminated": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/termination_logs",
        Some(json!({"worker_id": "GHOST"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/review_counts",
        Some(json!({"worker_id": "GHOST"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_counts_reject_overflow_and_negatives() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/review_counts",
        Some(json!({"worker_id": "W1", "count_5": i64::MAX, "count_4": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/review_counts",
        Some(json!({"worker_id": "W1", "count_1": -3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["review_counts"].is_null());
}

#[tokio::test]
async fn test_delete_single_rows() {
    let app = setup_app().await;
    seed_worker(&app, "W1").await;
    send(
        &app,
        "POST",
        "/termination_status",
        Some(json!({"worker_id": "W1"})),
    )
    .await;
    let (_, body) = send(
        &app,
        "POST",
        "/termination_logs",
        Some(json!({"worker_id": "W1"})),
    )
    .await;
    let log_id = body["log_id"].as_i64().unwrap();
    send(&app, "POST", "/review_counts", Some(json!({"worker_id": "W1"}))).await;

    let (status, _) = send(&app, "DELETE", "/termination_status/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/termination_status/W1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/termination_logs/{}", log_id);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/review_counts/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/review_counts/W1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Worker row itself is untouched
    let (status, _) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("gigworkers.db");

    {
        let pool = db::init_database_pool(&path).await.unwrap();
        let app = build_router(AppState::new(pool.clone()));
        seed_worker(&app, "W1").await;
        pool.close().await;
    }

    let pool = db::init_database_pool(&path).await.unwrap();
    let app = build_router(AppState::new(pool));
    let (status, body) = send(&app, "GET", "/workers/W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["worker"]["worker_id"], "W1");
}
