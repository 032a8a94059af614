// handlers/elevated/superadmin/login.rs - POST /superadmin/login handler

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuperadminLoginRequest {
    pub email: String,
    pub password: String,
}

/// 401 on any mismatch; the response does not say which part was wrong.
pub async fn superadmin_login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SuperadminLoginRequest>,
) -> ApiResult<TokenPair> {
    let tokens = state
        .sessions
        .issue_superadmin_session(&body.email, &body.password, Utc::now())
        .await?;
    Ok(ApiResponse::success(tokens))
}
