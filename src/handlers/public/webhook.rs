// handlers/public/webhook.rs - POST /api/tenants/mark-paid handler

use axum::{extract::State, http::HeaderMap};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::secret::constant_time_eq;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::TenantView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub slug: String,
}

/// Payment provider callback: flips the tenant to `active`.
///
/// When a webhook secret is configured the caller must send it in
/// `x-webhook-secret`.
pub async fn mark_paid_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<MarkPaidRequest>,
) -> ApiResult<TenantView> {
    if let Some(expected) = state.config.security.webhook_secret.as_deref() {
        let provided = headers
            .get("x-webhook-secret")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !constant_time_eq(provided, expected) {
            tracing::warn!(slug = %body.slug, "mark-paid webhook rejected");
            return Err(ApiError::unauthorized("Invalid webhook secret"));
        }
    }

    let tenant = state.tenants.mark_paid(&body.slug, Utc::now()).await?;
    Ok(ApiResponse::success(tenant.to_view()))
}
