// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition and the tenant admin key reset flow.

pub mod login;
pub mod refresh;
pub mod reset;

pub use login::admin_login_post;
pub use refresh::refresh_post;
pub use reset::{reset_confirm_post, reset_request_post};
