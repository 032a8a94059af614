// handlers/public/system.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Funeral Platform API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": "/api/signup, /api/admin/login, /api/auth/*, /api/tenant/:slug, /api/tenants",
            "site": "/api/:tenantSlug/memorials, /api/:tenantSlug/memorial/:id",
            "admin": "/api/:tenantSlug/admin/* (tenant admin token)",
            "superadmin": "/superadmin/login, /superadmin/api/* (superadmin token)",
            "uploads": "/uploads/*"
        }
    })))
}

/// Liveness plus a check that the data directory is reachable.
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let storage = match tokio::fs::metadata(state.store.root()).await {
        Ok(meta) if meta.is_dir() => "ok",
        Ok(_) => "not a directory",
        // Created lazily on first write.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => "empty",
        Err(_) => "unreachable",
    };

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "storage": storage
    })))
}
