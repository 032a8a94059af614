// handlers/elevated/superadmin/tenant/delete.rs - DELETE /superadmin/api/tenants/:slug handler

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SuperadminIdentity;
use crate::state::AppState;

/// Remove the tenant record, its admin key and its data directory.
/// Uploaded files are left in place.
pub async fn tenant_delete(
    State(state): State<AppState>,
    Extension(operator): Extension<SuperadminIdentity>,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    if !state.tenants.delete(&slug).await? {
        return Err(ApiError::not_found(format!("Tenant '{}' not found", slug)));
    }

    state.credentials.remove(&slug).await?;
    state.store.remove_dir(format!("tenants/{slug}")).await?;

    tracing::info!(slug = %slug, operator = %operator.email, "tenant deleted");
    Ok(ApiResponse::success(json!({ "deleted": slug })))
}
