//! Helpers shared by the backend integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aura_grow::services::auth::issue_token;
use aura_grow::{external::RecommendationProvider, AppState, Config};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use shared::{AiErrorKind, EnvironmentSnapshot, ProviderOutcome, User};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";

/// Provider double that counts calls and answers with a fixed outcome
pub struct CountingProvider {
    calls: AtomicUsize,
    outcome: ProviderOutcome,
}

impl CountingProvider {
    pub fn new(outcome: ProviderOutcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome,
        })
    }

    pub fn failing(kind: AiErrorKind, message: &str) -> Arc<Self> {
        Self::new(ProviderOutcome::failure(kind, message))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationProvider for CountingProvider {
    async fn recommend(&self, _snapshot: &EnvironmentSnapshot) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Configuration rooted in `dir` for data and static files
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.environment = "test".to_string();
    config.jwt.secret = TEST_SECRET.to_string();
    config.storage.data_dir = dir.join("data").to_string_lossy().into_owned();
    config.server.static_dir = dir.join("frontend").to_string_lossy().into_owned();
    config
}

pub fn test_state(config: Config, provider: Arc<dyn RecommendationProvider>) -> AppState {
    AppState::with_provider(config, provider)
}

/// Bearer token for a user with `id`
pub fn token_for(id: i64) -> String {
    let user = User {
        id,
        name: "Somchai".to_string(),
        email: format!("user{}@example.com", id),
        password_hash: String::new(),
    };
    issue_token(&user, TEST_SECRET, 3600).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through `app` and decode the JSON reply
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
