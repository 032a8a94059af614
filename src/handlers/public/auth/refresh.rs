// handlers/public/auth/refresh.rs - POST /api/auth/refresh handler

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

/// Mint a new access token from a refresh token. Works for both roles;
/// tenant admins are re-checked against the trial gate.
pub async fn refresh_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> ApiResult<TokenPair> {
    let tokens = state.sessions.refresh(&body.refresh_token, Utc::now()).await?;
    Ok(ApiResponse::success(tokens))
}
