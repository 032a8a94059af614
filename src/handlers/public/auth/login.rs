// handlers/public/auth/login.rs - POST /api/admin/login handler

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::TokenPair;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(alias = "slug")]
    pub tenant: String,
    #[serde(alias = "adminKey")]
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub tenant: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Exchange a tenant admin key for a tenant-scoped session.
///
/// 404 when the tenant has no key on record, 403 on a wrong key, 402
/// (`TRIAL_EXPIRED`) when the key is right but the trial is over.
pub async fn admin_login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AdminLoginRequest>,
) -> ApiResult<AdminLoginResponse> {
    let slug = body.tenant.trim().to_string();
    let tokens = state.sessions.issue_tenant_session(&slug, &body.key, Utc::now()).await?;

    Ok(ApiResponse::success(AdminLoginResponse { tenant: slug, tokens }))
}
