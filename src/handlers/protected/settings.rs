// handlers/protected/settings.rs - POST /api/tenant/:slug/settings handler

use axum::extract::State;
use axum::Extension;

use crate::middleware::{ApiJson, ApiResponse, ApiResult, TenantAdmin};
use crate::models::{TenantSettings, TenantView};
use crate::state::AppState;

/// Partial update of the tenant's own profile and branding.
///
/// Accepts `funeralHomeName`, `email`, `logo`, `brandColor` and `features`;
/// any other key is a 400. The slug and status cannot be changed here.
pub async fn settings_post(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    ApiJson(settings): ApiJson<TenantSettings>,
) -> ApiResult<TenantView> {
    let tenant = state.tenants.update_settings(&admin.slug, settings.into()).await?;
    tracing::info!(slug = %tenant.slug, "tenant settings updated");
    Ok(ApiResponse::success(tenant.to_view()))
}
