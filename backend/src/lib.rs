//! Aura Grow - Backend Server
//!
//! Environmental monitoring for home growers: air quality and weather
//! readings, plus AI plant recommendations with a local fallback.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use crate::error::AppResult;
use crate::external::{GeminiClient, RecommendationProvider, WeatherClient};
use crate::middleware::RateLimiter;
use crate::store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub weather: WeatherClient,
    pub provider: Arc<dyn RecommendationProvider>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Build state with the Gemini provider
    pub fn from_config(config: Config) -> AppResult<Self> {
        let provider = Arc::new(GeminiClient::new(&config.gemini)?);
        Ok(Self::with_provider(config, provider))
    }

    /// Build state around any recommendation provider
    pub fn with_provider(config: Config, provider: Arc<dyn RecommendationProvider>) -> Self {
        Self {
            store: Arc::new(Store::open(&config.storage)),
            weather: WeatherClient::new(&config.weather),
            rate_limiter: RateLimiter::from_config(&config.rate_limit),
            provider,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Frontend, with client-side routes falling back to index.html
    let static_dir = &state.config.server.static_dir;
    let frontend = ServeDir::new(static_dir)
        .fallback(ServeFile::new(format!("{}/index.html", static_dir)));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes(state.clone()))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
