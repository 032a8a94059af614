// handlers/elevated/superadmin/tenant/mod.rs - Tenant management handlers
//
// GET    /superadmin/api/tenants        - list
// POST   /superadmin/api/tenants        - create (with admin key)
// GET    /superadmin/api/tenants/:slug  - show
// PUT    /superadmin/api/tenants/:slug  - update (also /superadmin/api/tenant/:slug)
// DELETE /superadmin/api/tenants/:slug  - delete tenant, key and data

use serde::Serialize;

use crate::models::{TenantStatusReport, TenantView};

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use create::tenant_create;
pub use delete::tenant_delete;
pub use list::tenant_list;
pub use show::tenant_show;
pub use update::tenant_update;

/// Tenant as the superadmin panel sees it: profile plus computed status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    #[serde(flatten)]
    pub tenant: TenantView,
    pub trial_expired: bool,
    pub days_remaining: i64,
    pub has_admin_key: bool,
}

impl TenantSummary {
    pub fn new(tenant: TenantView, status: &TenantStatusReport, has_admin_key: bool) -> Self {
        Self {
            tenant,
            trial_expired: status.trial_expired,
            days_remaining: status.days_remaining,
            has_admin_key,
        }
    }
}
