//! Error handling for the Aura Grow backend
//!
//! Every error renders as `{ "error": "...", "details"?: "..." }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Missing Authorization header")]
    MissingAuthorization,

    #[error("Invalid Authorization format")]
    InvalidAuthorizationFormat,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Validation errors
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    UserExists,

    #[error("Too many AI requests, slow down")]
    RateLimited,

    #[error("Not found")]
    NotFound,

    // External service errors
    #[error("{context}: {details}")]
    ExternalService { context: String, details: String },

    #[error("AI recommendation failed: {0}")]
    RecommendationFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingAuthorization
            | AppError::InvalidAuthorizationFormat
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::UserExists => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ExternalService { .. }
            | AppError::RecommendationFailed(_)
            | AppError::Configuration(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::ExternalService { context, .. } => ErrorResponse::new(context.clone()),
            AppError::RecommendationFailed(details) => ErrorResponse {
                error: "AI recommendation failed".to_string(),
                details: Some(details.clone()),
            },
            AppError::Configuration(msg) | AppError::Internal(msg) => {
                ErrorResponse::new(msg.clone())
            }
            AppError::Storage(_) => ErrorResponse::new("Storage unavailable"),
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
