//! Operational endpoint tests for gemini-gateway.

mod common;

use axum::http::StatusCode;
use common::{mock, TestApp};
use serde_json::Value;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn(mock()).await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gemini-gateway");
    assert_eq!(body["model"], "mock-model");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_depends_on_upload_directory() {
    let app = TestApp::spawn(mock()).await;

    let ready = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(StatusCode::OK, ready.status());

    app.cleanup().await;

    let not_ready = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, not_ready.status());
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = TestApp::spawn(mock()).await;

    let response = app
        .client
        .post(app.url("/generate-video"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(StatusCode::NOT_FOUND, response.status());
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Route not found");

    app.cleanup().await;
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn(mock()).await;

    let response = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    app.cleanup().await;
}
