//! Authentication handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::auth::{LoginInput, LoginResponse, SignupInput};
use crate::services::AuthService;
use crate::AppState;

#[derive(Serialize)]
pub struct SignupResponse {
    pub success: bool,
}

/// Signup endpoint handler
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupInput>,
) -> AppResult<Json<SignupResponse>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    auth_service.signup(body).await?;

    Ok(Json(SignupResponse { success: true }))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    Ok(Json(auth_service.login(body).await?))
}
