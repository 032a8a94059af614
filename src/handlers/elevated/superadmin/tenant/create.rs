// handlers/elevated/superadmin/tenant/create.rs - POST /superadmin/api/tenants handler

use axum::extract::State;
use axum::Extension;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::secret::generate_admin_key;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::TenantView;
use crate::services::{NewTenant, SuperadminIdentity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTenantRequest {
    #[serde(alias = "name")]
    pub funeral_home_name: String,
    pub email: String,
    pub slug: Option<String>,
    /// Generated when absent.
    pub admin_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTenant {
    pub tenant: TenantView,
    /// Returned once so the operator can pass it on.
    pub admin_key: String,
}

/// Provision a tenant by hand. An explicit slug that is already taken is a
/// 409 rather than being suffixed.
pub async fn tenant_create(
    State(state): State<AppState>,
    Extension(operator): Extension<SuperadminIdentity>,
    ApiJson(body): ApiJson<CreateTenantRequest>,
) -> ApiResult<CreatedTenant> {
    let admin_key = match body.admin_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        Some(key) => {
            state.admin_auth.validate_new_key(&key)?;
            key
        }
        None => generate_admin_key(),
    };

    let now = Utc::now();
    let tenant = state
        .tenants
        .create(
            NewTenant {
                funeral_home_name: body.funeral_home_name,
                email: body.email,
                slug: body.slug,
                unique_email: false,
            },
            now,
        )
        .await?;

    if let Err(e) = state.credentials.set_key(&tenant.slug, &admin_key, now).await {
        if let Err(cleanup) = state.tenants.delete(&tenant.slug).await {
            tracing::error!(slug = %tenant.slug, error = %cleanup, "failed to roll back tenant creation");
        }
        return Err(e.into());
    }

    tracing::info!(slug = %tenant.slug, operator = %operator.email, "tenant provisioned");
    Ok(ApiResponse::created(CreatedTenant {
        tenant: tenant.to_view(),
        admin_key,
    }))
}
