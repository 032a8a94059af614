use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::error::ApiError;
use crate::state::AppState;

/// Path parameter names that carry the tenant slug, depending on the route.
const TENANT_PARAMS: &[&str] = &["tenantSlug", "slug", "tenant"];

/// Tenant admin context attached to requests that passed the tenant gate
#[derive(Clone, Debug)]
pub struct TenantAdmin {
    pub slug: String,
}

/// Superadmin gate: valid, unexpired access token with the superadmin role
pub async fn superadmin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(request.headers()).map_err(ApiError::unauthorized)?;
    let identity = state.sessions.require_superadmin(&token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Tenant admin gate: the token must be scoped to the tenant named in the
/// path, and the tenant must still be allowed in (trial, suspension).
pub async fn tenant_admin_auth_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let slug = TENANT_PARAMS
        .iter()
        .find_map(|name| params.get(*name))
        .cloned()
        .ok_or_else(|| ApiError::bad_request("Missing tenant in path"))?;

    let token = extract_token_from_headers(request.headers()).map_err(ApiError::unauthorized)?;
    state.sessions.require_tenant_admin(&token, &slug, Utc::now()).await?;

    request.extensions_mut().insert(TenantAdmin { slug });
    Ok(next.run(request).await)
}

/// Extract a bearer token from `Authorization` or `x-auth-token`
pub fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, String> {
    if let Some(auth_header) = headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format".to_string())?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?;
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        return Ok(token.trim().to_string());
    }

    match headers.get("x-auth-token").map(|v| v.to_str()) {
        Some(Ok(token)) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Invalid x-auth-token header".to_string()),
        None => Err("Missing Authorization header".to_string()),
    }
}
