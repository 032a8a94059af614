// handlers/elevated/superadmin/mod.rs - Superadmin panel handlers

pub mod login;
pub mod tenant;

pub use login::superadmin_login_post;
pub use tenant::{tenant_create, tenant_delete, tenant_list, tenant_show, tenant_update};
