//! Authentication tests
//!
//! Signup, login and token handling through the real router.

mod common;

use aura_grow::create_app;
use axum::http::{Method, StatusCode};
use common::*;
use proptest::prelude::*;
use serde_json::json;
use shared::AiErrorKind;

fn app(dir: &std::path::Path) -> axum::Router {
    let provider = CountingProvider::failing(AiErrorKind::NoApiKey, "GEMINI_API_KEY not configured");
    create_app(test_state(test_config(dir), provider))
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_then_login() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/signup",
            None,
            Some(json!({"name": "Niran", "email": "Niran@Example.com", "password": "hunter22"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "niran@example.com", "password": "hunter22"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Niran");
    assert_eq!(body["user"]["email"], "niran@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    // The issued token opens protected routes
    let token = body["token"].as_str().unwrap();
    let (status, body) = send(&app, json_request(Method::GET, "/api/latest", Some(token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": null}));
}

#[tokio::test]
async fn test_signup_requires_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/signup", None, Some(json!({"email": "a@b.co"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "name,email,password required"}));
}

#[tokio::test]
async fn test_duplicate_email_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let signup = |email: &str| {
        json_request(
            Method::POST,
            "/api/signup",
            None,
            Some(json!({"name": "Ploy", "email": email, "password": "pw"})),
        )
    };

    let (status, _) = send(&app, signup("ploy@example.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, signup("PLOY@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "User already exists"}));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    send(
        &app,
        json_request(
            Method::POST,
            "/api/signup",
            None,
            Some(json!({"name": "Kai", "email": "kai@example.com", "password": "right"})),
        ),
    )
    .await;

    for body in [
        json!({"email": "kai@example.com", "password": "wrong"}),
        json!({"email": "nobody@example.com", "password": "right"}),
    ] {
        let (status, reply) = send(&app, json_request(Method::POST, "/api/login", None, Some(body))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply, json!({"error": "Invalid credentials"}));
    }

    let (status, reply) = send(
        &app,
        json_request(Method::POST, "/api/login", None, Some(json!({"email": "kai@example.com"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply, json!({"error": "email,password required"}));
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/latest")
        .header("Authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid Authorization format"}));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Tokens carry the identity they were issued for
    #[test]
    fn prop_token_claims_round_trip(id in 1i64..i64::MAX / 2) {
        let token = token_for(id);
        let claims = aura_grow::services::auth::decode_token(&token, TEST_SECRET).unwrap();
        prop_assert_eq!(claims.id, id);
        prop_assert_eq!(claims.email, format!("user{}@example.com", id));
    }

    /// A token signed with another secret never verifies
    #[test]
    fn prop_foreign_secret_rejected(id in 1i64..1_000_000, secret in "[a-z]{8,16}") {
        prop_assume!(secret != TEST_SECRET);
        let token = token_for(id);
        prop_assert!(aura_grow::services::auth::decode_token(&token, &secret).is_err());
    }
}
