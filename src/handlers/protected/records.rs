// handlers/protected/records.rs - CRUD over a tenant's record collections
//
// GET    .../<collection>      - collection_get
// POST   .../<collection>      - collection_post
// GET    .../<collection>/:id  - record_get
// PATCH  .../<collection>/:id  - record_patch
// DELETE .../<collection>/:id  - record_delete
//
// Generic over the resource; the router instantiates one set per collection.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, TenantAdmin};
use crate::models::{Appointment, Invoice, Memorial};
use crate::services::{Collection, Resource};
use crate::state::AppState;

/// A resource whose collection lives in [`AppState`].
pub trait Scoped: Resource {
    fn collection(state: &AppState) -> &Collection<Self>;
}

impl Scoped for Memorial {
    fn collection(state: &AppState) -> &Collection<Self> {
        &state.memorials
    }
}

impl Scoped for Appointment {
    fn collection(state: &AppState) -> &Collection<Self> {
        &state.appointments
    }
}

impl Scoped for Invoice {
    fn collection(state: &AppState) -> &Collection<Self> {
        &state.invoices
    }
}

pub(crate) fn record_id(params: &HashMap<String, String>) -> Result<&str, ApiError> {
    params
        .get("id")
        .map(String::as_str)
        .ok_or_else(|| ApiError::bad_request("Missing record id in path"))
}

pub async fn collection_get<R: Scoped>(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
) -> ApiResult<Vec<R>> {
    Ok(ApiResponse::success(R::collection(&state).list(&admin.slug).await?))
}

pub async fn collection_post<R: Scoped>(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    ApiJson(draft): ApiJson<R::Draft>,
) -> ApiResult<R> {
    let record = R::collection(&state).add(&admin.slug, draft).await?;
    Ok(ApiResponse::created(record))
}

pub async fn record_get<R: Scoped>(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<R> {
    let id = record_id(&params)?;
    Ok(ApiResponse::success(R::collection(&state).get(&admin.slug, id).await?))
}

pub async fn record_patch<R: Scoped>(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    Path(params): Path<HashMap<String, String>>,
    ApiJson(patch): ApiJson<R::Patch>,
) -> ApiResult<R> {
    let id = record_id(&params)?;
    Ok(ApiResponse::success(R::collection(&state).update(&admin.slug, id, patch).await?))
}

pub async fn record_delete<R: Scoped>(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Value> {
    let id = record_id(&params)?;
    R::collection(&state).delete(&admin.slug, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
