// handlers/protected/pdf.rs - POST /api/:tenantSlug/admin/pdf/from-form handler

use axum::extract::State;
use axum::Extension;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::middleware::{ApiJson, ApiResponse, ApiResult, TenantAdmin};
use crate::services::{DocumentError, FormDocument};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GeneratedDocument {
    pub ok: bool,
    pub url: String,
}

/// Render an arrangement summary from arbitrary form fields and publish it
/// under `/uploads/pdf/<slug>/`.
pub async fn pdf_from_form_post(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    ApiJson(fields): ApiJson<Map<String, Value>>,
) -> ApiResult<GeneratedDocument> {
    let document = FormDocument::arrangement_summary(&fields);
    let bytes = state.documents.render(&document).await?;

    let dir = state.uploads_dir().join("pdf").join(&admin.slug);
    let file_name = format!("funeral-form-{}.{}", Utc::now().timestamp_millis(), state.documents.extension());
    let path = dir.join(&file_name);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| DocumentError::Io { path: dir.clone(), source })?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| DocumentError::Io { path: path.clone(), source })?;

    tracing::info!(slug = %admin.slug, file = %file_name, "document generated");
    Ok(ApiResponse::created(GeneratedDocument {
        ok: true,
        url: format!("/uploads/pdf/{}/{}", admin.slug, file_name),
    }))
}
