// HTTP adapter tests
//
// Drive the axum router in-process with tower's `oneshot`; no socket is
// bound. Covers status mapping and that error bodies never carry internals.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use identity_service::{
    config::PasswordSettings,
    db::InMemoryUserRepository,
    http::{build_router, HttpServerState},
    security::{PasswordHasher, TokenIssuer, TokenVerifier},
    CredentialService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &[u8] = b"http-test-signing-secret-4b7e1d9a2c6f0358";

fn app() -> Router {
    let hasher = PasswordHasher::new(&PasswordSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test parameters");

    let credentials = CredentialService::new(
        Arc::new(InMemoryUserRepository::new()),
        hasher,
        TokenIssuer::new(SECRET).expect("issuer"),
        TokenVerifier::new(SECRET).expect("verifier"),
        Duration::days(30),
    )
    .expect("service");

    build_router(HttpServerState {
        credentials: Arc::new(credentials),
    })
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_and_login_over_http() {
    let app = app();

    let (status, body) = post_json(
        &app,
        "/auth/signup",
        json!({ "name": "Ada", "email": "ada@x.io", "password": "correcthorse" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ada@x.io");
    let user_id = body["id"].clone();
    let token = body["token"].as_str().expect("token").to_string();

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "email": "ada@x.io", "password": "correcthorse" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id);
    assert_eq!(body["name"], "Ada");
    assert!(body.get("password_hash").is_none());

    let (status, body) = post_json(&app, "/auth/check-token", json!({ "token": token })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "valid": true }));
}

#[tokio::test]
async fn test_duplicate_signup_is_forbidden() {
    let app = app();
    let payload = json!({ "name": "Ada", "email": "ada@x.io", "password": "correcthorse" });
    post_json(&app, "/auth/signup", payload).await;

    let (status, body) = post_json(
        &app,
        "/auth/signup",
        json!({ "name": "Eve", "email": "ada@x.io", "password": "anything" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Email already exists" }));
}

#[tokio::test]
async fn test_login_failures_have_identical_responses() {
    let app = app();
    post_json(
        &app,
        "/auth/signup",
        json!({ "name": "Ada", "email": "ada@x.io", "password": "correcthorse" }),
    )
    .await;

    let unknown = post_json(
        &app,
        "/auth/login",
        json!({ "email": "nobody@x.io", "password": "correcthorse" }),
    )
    .await;
    let mismatch = post_json(
        &app,
        "/auth/login",
        json!({ "email": "ada@x.io", "password": "wrong" }),
    )
    .await;

    assert_eq!(unknown, mismatch);
    assert_eq!(unknown.0, StatusCode::FORBIDDEN);
    assert_eq!(unknown.1, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn test_invalid_signup_payload_is_bad_request() {
    let (status, body) = post_json(
        &app(),
        "/auth/signup",
        json!({ "name": "Ada", "email": "not-an-email", "password": "correcthorse" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Validation error"));
}

#[tokio::test]
async fn test_check_token_never_errors() {
    let app = app();

    let foreign = TokenIssuer::new(b"foreign-secret-that-signed-this-token-01")
        .unwrap()
        .issue(uuid::Uuid::new_v4(), "ada@x.io", Duration::days(1))
        .unwrap();

    for body in [
        json!({ "token": foreign }),
        json!({ "token": "garbage" }),
        json!({ "wrong_field": true }),
    ] {
        let (status, response) = post_json(&app, "/auth/check-token", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, json!({ "valid": false }));
    }
}
