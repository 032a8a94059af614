pub mod collection;
pub mod credential_service;
pub mod document;
pub mod notify;
pub mod superadmin_service;
pub mod tenant_service;

pub use collection::{Collection, CollectionError, Resource};
pub use credential_service::{AdminAuthService, CredentialStore};
pub use document::{DocumentError, DocumentRenderer, FormDocument, PdfRenderer};
pub use notify::{LogMailer, Mailer, NotifyError, OutboundEmail};
pub use superadmin_service::{SessionService, SuperadminIdentity};
pub use tenant_service::{NewTenant, TenantError, TenantRegistry};
