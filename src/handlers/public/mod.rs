// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, onboarding, and everything a tenant's public site reads.

pub mod auth;
pub mod directory;
pub mod memorials;
pub mod signup;
pub mod system;
pub mod webhook;

pub use directory::{tenant_directory, tenant_get, tenant_status};
pub use memorials::{public_memorial_get, public_memorials_list};
pub use signup::signup_post;
pub use system::{health, root};
pub use webhook::mark_paid_post;
