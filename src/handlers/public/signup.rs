// handlers/public/signup.rs - POST /api/signup handler

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::secret::generate_admin_key;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::TenantView;
use crate::services::NewTenant;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(alias = "name")]
    pub funeral_home_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub slug: String,
    /// Shown once; only its hash is kept.
    pub temp_admin_key: String,
    pub tenant: TenantView,
}

/// Self-service onboarding. Starts a trial and issues a temporary admin key.
///
/// Input: `{"funeralHomeName": "...", "email": "..."}`. A name whose slug is
/// taken gets a numeric suffix; an email that is already registered is a 409.
pub async fn signup_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let now = Utc::now();
    let tenant = state
        .tenants
        .create(
            NewTenant {
                funeral_home_name: body.funeral_home_name,
                email: body.email,
                slug: None,
                unique_email: true,
            },
            now,
        )
        .await?;

    let key = generate_admin_key();
    if let Err(e) = state.credentials.set_key(&tenant.slug, &key, now).await {
        // Without a key nobody could ever administer the tenant.
        if let Err(cleanup) = state.tenants.delete(&tenant.slug).await {
            tracing::error!(slug = %tenant.slug, error = %cleanup, "failed to roll back signup");
        }
        return Err(e.into());
    }

    tracing::info!(slug = %tenant.slug, "self-service signup");
    Ok(ApiResponse::created(SignupResponse {
        slug: tenant.slug.clone(),
        temp_admin_key: key,
        tenant: tenant.to_view(),
    }))
}
