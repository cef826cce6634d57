//! Per-client sliding window rate limiting for the recommendation routes

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::AppState;

/// Sliding window limiter keyed by client identity.
///
/// Every attempt is recorded, rejected ones included, so a client that keeps
/// hammering stays limited until it backs off for a whole window.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    hits: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            hits: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Record an attempt for `key`; `false` when it exceeds the limit
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().await;

        // Drop clients whose whole history fell out of the window
        hits.retain(|_, times| {
            times
                .last()
                .is_some_and(|t| now.duration_since(*t) < self.window)
        });

        let times = hits.entry(key.to_string()).or_default();
        times.retain(|t| now.duration_since(*t) < self.window);
        times.push(now);
        times.len() <= self.max_requests
    }

    /// Attempts currently counted for `key`
    pub async fn hits(&self, key: &str) -> usize {
        let now = Instant::now();
        self.hits.read().await.get(key).map_or(0, |times| {
            times
                .iter()
                .filter(|t| now.duration_since(**t) < self.window)
                .count()
        })
    }
}

/// Client identity: the peer IP, or `unknown` when the server was started
/// without connect info.
pub fn client_key(connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(connect_info.as_ref());
    if !state.rate_limiter.check(&key).await {
        tracing::warn!(client = %key, "AI rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}
