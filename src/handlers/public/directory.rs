// handlers/public/directory.rs - Public tenant lookups
//
// GET /api/tenants             - directory for the public site
// GET /api/tenant/:slug        - one tenant (no reset state)
// GET /api/tenant/:slug/status - trial/payment status

use axum::extract::{Path, State};
use chrono::Utc;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{TenantListing, TenantStatusReport, TenantView};
use crate::services::tenant_service::compute_status;
use crate::state::AppState;

pub async fn tenant_directory(State(state): State<AppState>) -> ApiResult<Vec<TenantListing>> {
    let listings = state.tenants.list().await.iter().map(|t| t.to_listing()).collect();
    Ok(ApiResponse::success(listings))
}

pub async fn tenant_get(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<TenantView> {
    let tenant = state.tenants.find_by_slug(&slug).await?;
    Ok(ApiResponse::success(tenant.to_view()))
}

pub async fn tenant_status(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<TenantStatusReport> {
    let tenant = state.tenants.find_by_slug(&slug).await?;
    Ok(ApiResponse::success(compute_status(&tenant, Utc::now())))
}
