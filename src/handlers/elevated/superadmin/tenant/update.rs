// handlers/elevated/superadmin/tenant/update.rs - PUT /superadmin/api/tenants/:slug handler

use axum::extract::{Path, State};
use axum::Extension;

use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::{TenantUpdate, TenantView};
use crate::services::SuperadminIdentity;
use crate::state::AppState;

/// Edit profile, branding, feature toggles or lifecycle status.
pub async fn tenant_update(
    State(state): State<AppState>,
    Extension(operator): Extension<SuperadminIdentity>,
    Path(slug): Path<String>,
    ApiJson(update): ApiJson<TenantUpdate>,
) -> ApiResult<TenantView> {
    let tenant = state.tenants.update_settings(&slug, update).await?;
    tracing::info!(slug = %tenant.slug, operator = %operator.email, "tenant updated");
    Ok(ApiResponse::success(tenant.to_view()))
}
