// handlers/protected/memorials.rs - POST /api/:tenantSlug/admin/memorials
//
// Multipart create: text parts are memorial fields, an optional `photo` part
// is stored under uploads/memorial-photos and linked as `photoPath`.

use std::path::Path as FsPath;

use axum::extract::{Multipart, State};
use axum::Extension;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantAdmin};
use crate::models::{Memorial, MemorialDraft};
use crate::state::AppState;

const PHOTO_DIR: &str = "memorial-photos";
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

struct PhotoUpload {
    extension: String,
    bytes: axum::body::Bytes,
}

pub async fn memorial_create(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
    mut multipart: Multipart,
) -> ApiResult<Memorial> {
    let mut fields = Map::new();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "photo" {
            let extension = field.file_name().and_then(photo_extension);
            let bytes = field.bytes().await?;
            if bytes.is_empty() {
                continue;
            }
            let extension =
                extension.ok_or_else(|| ApiError::field_error("photo", "Only jpg, png, gif or webp images are accepted"))?;
            photo = Some(PhotoUpload { extension, bytes });
            continue;
        }

        let text = field.text().await?;
        // Browsers send empty strings for untouched inputs.
        if !text.trim().is_empty() {
            fields.insert(name, Value::String(text));
        }
    }

    let mut draft: MemorialDraft =
        serde_json::from_value(Value::Object(fields)).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let saved = match photo {
        Some(upload) => Some(save_photo(state.uploads_dir(), upload).await?),
        None => None,
    };
    draft.photo_path = saved.as_ref().map(|(_, url)| url.clone());

    match state.memorials.add(&admin.slug, draft).await {
        Ok(memorial) => Ok(ApiResponse::created(memorial)),
        Err(e) => {
            if let Some((path, _)) = saved {
                let _ = tokio::fs::remove_file(path).await;
            }
            Err(e.into())
        }
    }
}

fn photo_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    PHOTO_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Write the upload and return its file path and public URL.
async fn save_photo(uploads_dir: &FsPath, upload: PhotoUpload) -> Result<(std::path::PathBuf, String), ApiError> {
    let dir = uploads_dir.join(PHOTO_DIR);
    let file_name = format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>(),
        upload.extension
    );
    let path = dir.join(&file_name);

    let write = async {
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(&path, &upload.bytes).await
    };
    if let Err(e) = write.await {
        tracing::error!(path = %path.display(), error = %e, "failed to store memorial photo");
        return Err(ApiError::internal_server_error("Failed to store photo"));
    }

    Ok((path, format!("/uploads/{PHOTO_DIR}/{file_name}")))
}
