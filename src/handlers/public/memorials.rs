// handlers/public/memorials.rs - Memorial pages on the tenant's public site
//
// GET /api/:tenantSlug/memorials
// GET /api/:tenantSlug/memorial/:id

use axum::extract::{Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Memorial;
use crate::state::AppState;

pub async fn public_memorials_list(
    State(state): State<AppState>,
    Path(tenant_slug): Path<String>,
) -> ApiResult<Vec<Memorial>> {
    // Unknown tenants are a 404 here rather than an empty page.
    state.tenants.find_by_slug(&tenant_slug).await?;
    Ok(ApiResponse::success(state.memorials.list(&tenant_slug).await?))
}

pub async fn public_memorial_get(
    State(state): State<AppState>,
    Path((tenant_slug, id)): Path<(String, String)>,
) -> ApiResult<Memorial> {
    state.tenants.find_by_slug(&tenant_slug).await?;
    Ok(ApiResponse::success(state.memorials.get(&tenant_slug, &id).await?))
}
