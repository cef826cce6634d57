//! External API integrations

pub mod gemini;
pub mod weather;

pub use gemini::{GeminiClient, RecommendationProvider};
pub use weather::WeatherClient;
