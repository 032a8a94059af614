// handlers/public/auth/reset.rs - Admin key reset
//
// POST /api/auth/reset-request  {email}
// POST /api/auth/reset-confirm  {token, password}

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirm {
    pub token: String,
    #[serde(alias = "newKey", alias = "key")]
    pub password: String,
}

/// Always answers the same way, whether or not the email is registered.
pub async fn reset_request_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetRequest>,
) -> ApiResult<Value> {
    state.admin_auth.reset_request(&body.email, Utc::now()).await?;
    Ok(ApiResponse::success(json!({
        "message": "If that email is registered, a reset link has been sent."
    })))
}

pub async fn reset_confirm_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetConfirm>,
) -> ApiResult<Value> {
    let slug = state
        .admin_auth
        .reset_confirm(&body.token, &body.password, Utc::now())
        .await?;
    Ok(ApiResponse::success(json!({ "slug": slug })))
}
