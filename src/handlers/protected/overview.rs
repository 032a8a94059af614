// handlers/protected/overview.rs - GET /api/:tenantSlug/admin/overview handler

use axum::extract::State;
use axum::Extension;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, TenantAdmin};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub memorial_count: usize,
    pub appointment_count: usize,
    pub invoice_count: usize,
}

/// Dashboard counters.
pub async fn overview_get(
    State(state): State<AppState>,
    Extension(admin): Extension<TenantAdmin>,
) -> ApiResult<Overview> {
    let (memorials, appointments, invoices) = tokio::join!(
        state.memorials.count(&admin.slug),
        state.appointments.count(&admin.slug),
        state.invoices.count(&admin.slug),
    );

    Ok(ApiResponse::success(Overview {
        memorial_count: memorials?,
        appointment_count: appointments?,
        invoice_count: invoices?,
    }))
}
