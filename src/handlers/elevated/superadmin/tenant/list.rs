// handlers/elevated/superadmin/tenant/list.rs - GET /superadmin/api/tenants handler

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use super::TenantSummary;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tenant_service::compute_status;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TenantList {
    pub tenants: Vec<TenantSummary>,
}

pub async fn tenant_list(State(state): State<AppState>) -> ApiResult<TenantList> {
    let now = Utc::now();
    let mut tenants = Vec::new();

    for tenant in state.tenants.list().await {
        let status = compute_status(&tenant, now);
        let has_key = state.credentials.get(&tenant.slug).await.is_some();
        tenants.push(TenantSummary::new(tenant.to_view(), &status, has_key));
    }

    Ok(ApiResponse::success(TenantList { tenants }))
}
