//! Route definitions for the Aura Grow API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, rate_limit_middleware},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        // Weather and pollution (token optional)
        .route("/weather", get(handlers::get_weather))
        .route("/pollution", get(handlers::get_pollution))
        .route("/history", get(handlers::get_history))
        // Protected routes - readings
        .merge(reading_routes(state.clone()))
        // Protected routes - recommendations
        .merge(recommendation_routes(state))
        .fallback(handlers::api_not_found)
}

/// Reading routes (protected)
fn reading_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/reading", post(handlers::create_reading))
        .route("/latest", get(handlers::get_latest_reading))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Recommendation routes (protected, rate limited)
///
/// Authentication runs first so anonymous callers never use up the limit.
fn recommendation_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/ai-plants", post(handlers::recommend_plants))
        .route("/recommend", post(handlers::recommend_plants))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
