//! Plant recommendation handlers
//!
//! Serves both `/api/ai-plants` and `/api/recommend`. Provider failures are
//! answered with HTTP 200 and the local fallback so the dashboard always has
//! something to show.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use shared::{AiErrorKind, ProviderOutcome, RecommendationResult};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::RecommendationService;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Success {
        success: bool,
        data: Value,
    },
    Fallback {
        success: bool,
        #[serde(rename = "aiError")]
        ai_error: AiErrorKind,
        message: String,
        fallback: RecommendationResult,
    },
}

impl From<ProviderOutcome> for RecommendationResponse {
    fn from(outcome: ProviderOutcome) -> Self {
        match outcome {
            ProviderOutcome::Success { result } => RecommendationResponse::Success {
                success: true,
                data: result,
            },
            ProviderOutcome::Failure(failure) => RecommendationResponse::Fallback {
                success: false,
                ai_error: failure.kind,
                message: failure.message,
                fallback: failure.fallback,
            },
        }
    }
}

/// Recommend plants for the caller's environment
pub async fn recommend_plants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    body: Option<Json<Value>>,
) -> AppResult<Json<RecommendationResponse>> {
    let body = body.map(|Json(body)| body).unwrap_or(Value::Null);

    let service = RecommendationService::new(state.store.clone(), state.provider.clone());
    let outcome = service.recommend(current_user.0.user_id, &body).await?;
    Ok(Json(outcome.into()))
}
