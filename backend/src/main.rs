//! Aura Grow - Backend Server

use std::net::SocketAddr;

use aura_grow::{create_app, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aura_server=debug,aura_grow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Aura Grow Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "AI_PROVIDER=gemini. GEMINI_KEY={}",
        if config.gemini.api_key().is_some() { "yes" } else { "no" }
    );
    if config.weather.api_key().is_none() {
        tracing::warn!("OpenWeatherMap key not configured; weather and pollution lookups will fail");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::from_config(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
