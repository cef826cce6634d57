//! HTTP request handlers

pub mod auth;
pub mod health;
pub mod readings;
pub mod recommendation;
pub mod weather;

pub use auth::*;
pub use health::*;
pub use readings::*;
pub use recommendation::*;
pub use weather::*;

use crate::error::AppError;

/// Fallback for unknown API paths
pub async fn api_not_found() -> AppError {
    AppError::NotFound
}
