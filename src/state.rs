use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use crate::auth::{AuthError, TokenIssuer};
use crate::config::AppConfig;
use crate::models::{Appointment, Invoice, Memorial};
use crate::services::{
    AdminAuthService, Collection, CredentialStore, DocumentRenderer, LogMailer, Mailer, SessionService,
    PdfRenderer, TenantRegistry,
};
use crate::store::JsonStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: JsonStore,
    pub tenants: TenantRegistry,
    pub credentials: CredentialStore,
    pub admin_auth: AdminAuthService,
    pub sessions: SessionService,
    pub memorials: Collection<Memorial>,
    pub appointments: Collection<Appointment>,
    pub invoices: Collection<Invoice>,
    pub mailer: Arc<dyn Mailer>,
    pub documents: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// State with the default collaborators: log-only mail and the
    /// `printpdf` renderer.
    pub fn new(config: AppConfig) -> Result<Self, AuthError> {
        Self::with_collaborators(config, Arc::new(LogMailer), Arc::new(PdfRenderer))
    }

    pub fn with_collaborators(
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        documents: Arc<dyn DocumentRenderer>,
    ) -> Result<Self, AuthError> {
        let issuer = TokenIssuer::new(
            &config.security.jwt_secret,
            Duration::minutes(config.security.access_token_minutes as i64),
            Duration::hours(config.security.refresh_token_hours as i64),
        )?;

        let store = JsonStore::new(config.storage.data_dir.clone());
        let tenants = TenantRegistry::new(store.clone(), config.tenancy.trial_days);
        let credentials = CredentialStore::new(store.clone());
        let admin_auth = AdminAuthService::new(
            tenants.clone(),
            credentials.clone(),
            mailer.clone(),
            config.tenancy.reset_token_ttl_minutes,
            config.tenancy.min_admin_key_length,
            config.tenancy.public_base_url.clone(),
        );
        let sessions = SessionService::new(store.clone(), issuer, admin_auth.clone());

        Ok(Self {
            memorials: Collection::new(store.clone()),
            appointments: Collection::new(store.clone()),
            invoices: Collection::new(store.clone()),
            config: Arc::new(config),
            store,
            tenants,
            credentials,
            admin_auth,
            sessions,
            mailer,
            documents,
        })
    }

    pub fn uploads_dir(&self) -> &PathBuf {
        &self.config.storage.uploads_dir
    }
}
