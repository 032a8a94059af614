// handlers/protected/mod.rs - Tenant admin handlers
//
// Every route here sits behind `tenant_admin_auth_middleware`, which puts a
// `TenantAdmin` in the request extensions once the token, tenant scope and
// trial gate have been checked.

pub mod legacy;
pub mod memorials;
pub mod overview;
pub mod pdf;
pub mod records;
pub mod settings;

pub use memorials::memorial_create;
pub use overview::overview_get;
pub use pdf::pdf_from_form_post;
pub use records::{collection_get, collection_post, record_delete, record_get, record_patch, Scoped};
pub use settings::settings_post;
