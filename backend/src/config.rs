//! Configuration management for the Aura Grow backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with AURA_ prefix (`AURA__GEMINI__API_KEY`)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Flat-file storage configuration
    pub storage: StorageConfig,

    /// OpenWeatherMap configuration
    pub weather: WeatherConfig,

    /// Generative AI provider configuration
    pub gemini: GeminiConfig,

    /// Rate limit for the recommendation endpoints
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Directory of static frontend files
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Token lifetime in seconds
    pub expiry_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding users.json and readings.json
    pub data_dir: String,

    /// Readings kept before the oldest are evicted
    pub max_readings: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,

    /// OpenWeatherMap API base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Provider API key; recommendations fall back locally without it
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// API base URL
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Generation length limit
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window and client address
    pub max_requests: usize,

    /// Rolling window length in seconds
    pub window_secs: u64,
}

/// Unprefixed environment variables still honoured, and the key each sets
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("JWT_SECRET", "jwt.secret"),
    ("OWM_API_KEY", "weather.api_key"),
    ("GEMINI_API_KEY", "gemini.api_key"),
];

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AURA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "frontend")?
            .set_default("jwt.secret", "secret-dev")?
            .set_default("jwt.expiry_seconds", 7 * 24 * 3600)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.max_readings", 2000)?
            .set_default(
                "weather.base_url",
                "https://api.openweathermap.org/data/2.5",
            )?
            .set_default("gemini.model", "text-bison-001")?
            .set_default(
                "gemini.api_url",
                "https://generativelanguage.googleapis.com/v1beta2",
            )?
            .set_default("gemini.timeout_secs", 20)?
            .set_default("gemini.temperature", 0.5)?
            .set_default("gemini.max_output_tokens", 600)?
            .set_default("rate_limit.max_requests", 6)?
            .set_default("rate_limit.window_secs", 60)?;

        // Plain variable names from older deployments, below everything else
        for (var, key) in LEGACY_ENV_VARS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }

        let config = builder
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AURA_ prefix)
            .add_source(
                Environment::with_prefix("AURA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl WeatherConfig {
    /// API key, treating an empty value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl GeminiConfig {
    /// API key, treating an empty value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            static_dir: "frontend".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "secret-dev".to_string(),
            expiry_seconds: 7 * 24 * 3600,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            max_readings: 2000,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "text-bison-001".to_string(),
            api_url: "https://generativelanguage.googleapis.com/v1beta2".to_string(),
            timeout_secs: 20,
            temperature: 0.5,
            max_output_tokens: 600,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 6,
            window_secs: 60,
        }
    }
}
