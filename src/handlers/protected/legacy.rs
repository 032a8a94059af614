// handlers/protected/legacy.rs - Older memorial routes kept for existing admin pages
//
// GET/POST /api/memorials/:tenant           - list / JSON create
// GET      /api/memorials/:tenant/:id       - one memorial
// POST     /api/memorials/:tenant/update    - {id, ...fields}
// POST     /api/memorials/:tenant/delete    - {id}
//
// List, create and get reuse the generic record handlers.

use axum::extract::State;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, TenantAdmin};
use crate::models::{Memorial, MemorialPatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LegacyDelete {
    pub id: String,
}

fn take_id(body: &mut Map<String, Value>) -> Result<String, ApiError> {
    match body.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id),
        _ => Err(ApiError::field_error("id", "This field is required")),
    }
}

pub async fn legacy_update_post(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    ApiJson(mut body): ApiJson<Map<String, Value>>,
) -> ApiResult<Memorial> {
    let id = take_id(&mut body)?;
    let patch: MemorialPatch =
        serde_json::from_value(Value::Object(body)).map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(ApiResponse::success(state.memorials.update(&admin.slug, &id, patch).await?))
}

pub async fn legacy_delete_post(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    ApiJson(body): ApiJson<LegacyDelete>,
) -> ApiResult<Value> {
    state.memorials.delete(&admin.slug, &body.id).await?;
    Ok(ApiResponse::success(json!({ "deleted": body.id })))
}
