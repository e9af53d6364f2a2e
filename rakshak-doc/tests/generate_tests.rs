//! Integration tests for POST /generate-pdf against a fake model

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use rakshak_common::config::LlmConfig;
use rakshak_common::llm::GenerativeClient;
use rakshak_doc::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

const BOUNDARY: &str = "rakshak-test-boundary";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Fake generateContent endpoint: records the last request body and
/// answers with `status` and `reply`
async fn fake_model(status: StatusCode, reply: Value, seen: Arc<Mutex<Option<Value>>>) -> String {
    let app = Router::new()
        .route(
            "/generate",
            post(
                move |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    (status, Json(reply))
                },
            ),
        )
        .with_state(seen);
    format!("{}/generate", spawn(app).await)
}

fn app_for(model_url: String, api_key: Option<&str>) -> Router {
    let client = GenerativeClient::new(&LlmConfig {
        api_url: Some(model_url),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5.0,
    })
    .unwrap();
    build_router(AppState::new(client, Duration::from_secs(5)))
}

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn form_request(fields: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

fn model_reply(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

#[tokio::test]
async fn test_generate_pdf_returns_attachment() {
    let seen = Arc::new(Mutex::new(None));
    let url = fake_model(
        StatusCode::OK,
        model_reply("HEADER:\n- Worker statement\nFACTS:\n- Account deactivated on 3 March"),
        seen.clone(),
    )
    .await;
    let app = app_for(url, Some("test-key"));

    let response = app
        .oneshot(form_request(&[
            ("explanation", "My account was deactivated without notice"),
            ("proof", "SMS: Your ID has been blocked"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"worker_statement.pdf\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    let request = seen.lock().unwrap().clone().unwrap();
    let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("My account was deactivated without notice"));
    assert!(prompt.contains("SMS: Your ID has been blocked"));
    assert_eq!(request["generationConfig"]["maxOutputTokens"], 2000);
    assert_eq!(request["generationConfig"]["temperature"], 0.0);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let seen = Arc::new(Mutex::new(None));
    let url = fake_model(StatusCode::OK, model_reply("unused"), seen.clone()).await;
    let app = app_for(url, Some("test-key"));

    let response = app
        .clone()
        .oneshot(form_request(&[("explanation", "Deactivated")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"]["message"].as_str().unwrap().contains("proof"));

    let response = app
        .oneshot(form_request(&[("explanation", "  "), ("proof", "x")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_model_failure_is_bad_gateway() {
    let seen = Arc::new(Mutex::new(None));
    let url = fake_model(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "overloaded"}}),
        seen,
    )
    .await;
    let app = app_for(url, Some("test-key"));

    let response = app
        .oneshot(form_request(&[("explanation", "a"), ("proof", "b")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_reply_without_text_is_bad_gateway() {
    let seen = Arc::new(Mutex::new(None));
    let url = fake_model(StatusCode::OK, json!({"promptFeedback": {}}), seen).await;
    let app = app_for(url, Some("test-key"));

    let response = app
        .oneshot(form_request(&[("explanation", "a"), ("proof", "b")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unconfigured_model_is_bad_gateway() {
    let app = app_for("http://127.0.0.1:9/generate".to_string(), None);

    let response = app
        .oneshot(form_request(&[("explanation", "a"), ("proof", "b")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health_reports_model() {
    let client = GenerativeClient::new(&LlmConfig::default()).unwrap();
    let app = build_router(AppState::new(client, Duration::from_secs(5)));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rakshak-doc");
    assert_eq!(body["model"], "models/gemini-2.5-flash");
}
