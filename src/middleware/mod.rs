pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{superadmin_auth_middleware, tenant_admin_auth_middleware, TenantAdmin};
pub use extract::ApiJson;
pub use response::{ApiResponse, ApiResult};
