// handlers/elevated/superadmin/tenant/show.rs - GET /superadmin/api/tenants/:slug handler

use axum::extract::{Path, State};
use chrono::Utc;

use super::TenantSummary;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tenant_service::compute_status;
use crate::state::AppState;

pub async fn tenant_show(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<TenantSummary> {
    let tenant = state.tenants.find_by_slug(&slug).await?;
    let status = compute_status(&tenant, Utc::now());
    let has_key = state.credentials.get(&tenant.slug).await.is_some();

    Ok(ApiResponse::success(TenantSummary::new(tenant.to_view(), &status, has_key)))
}
