//! Tenant admin keys and the checks that gate the tenant admin surface.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::secret::{constant_time_eq, hash_secret, hash_token, random_token, verify_secret};
use crate::auth::{AuthError, TenantScope};
use crate::models::{Tenant, TenantStatus};
use crate::services::notify::{deliver, Mailer, OutboundEmail};
use crate::services::tenant_service::{compute_status, TenantError, TenantRegistry};
use crate::store::JsonStore;

const CREDENTIALS_FILE: &str = "admin_credentials.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredential {
    pub key_hash: String,
    pub updated_at: i64,
}

type CredentialMap = BTreeMap<String, AdminCredential>;

/// Map of tenant slug to hashed admin key.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    store: JsonStore,
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(store: JsonStore) -> Self {
        let path = store.path(CREDENTIALS_FILE);
        Self { store, path }
    }

    pub async fn get(&self, slug: &str) -> Option<AdminCredential> {
        let map: CredentialMap = self.store.read(&self.path, CredentialMap::new()).await;
        map.get(slug).cloned()
    }

    /// Store `key` for `slug`, replacing any previous key.
    pub async fn set_key(&self, slug: &str, key: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let credential = AdminCredential {
            key_hash: hash_secret(key)?,
            updated_at: now.timestamp_millis(),
        };
        let slug = slug.to_string();
        self.store
            .update(&self.path, CredentialMap::new(), move |map| {
                map.insert(slug, credential);
                Ok::<_, AuthError>(())
            })
            .await
    }

    pub async fn remove(&self, slug: &str) -> Result<bool, AuthError> {
        let slug = slug.to_string();
        self.store
            .update(&self.path, CredentialMap::new(), move |map| Ok::<_, AuthError>(map.remove(&slug).is_some()))
            .await
    }

    /// `TenantNotFound` when no record exists, `Forbidden` on a wrong key.
    pub async fn verify(&self, slug: &str, key: &str) -> Result<(), AuthError> {
        let credential = self
            .get(slug)
            .await
            .ok_or_else(|| AuthError::TenantNotFound(slug.to_string()))?;

        if verify_secret(key, &credential.key_hash)? {
            Ok(())
        } else {
            Err(AuthError::Forbidden("invalid admin key".to_string()))
        }
    }
}

/// Tenant admin authentication: key checks, the trial gate and password reset.
#[derive(Clone)]
pub struct AdminAuthService {
    tenants: TenantRegistry,
    credentials: CredentialStore,
    mailer: Arc<dyn Mailer>,
    reset_ttl: Duration,
    min_key_length: usize,
    public_base_url: String,
}

impl AdminAuthService {
    pub fn new(
        tenants: TenantRegistry,
        credentials: CredentialStore,
        mailer: Arc<dyn Mailer>,
        reset_ttl_minutes: u32,
        min_key_length: usize,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            tenants,
            credentials,
            mailer,
            reset_ttl: Duration::minutes(i64::from(reset_ttl_minutes)),
            min_key_length,
            public_base_url: public_base_url.into(),
        }
    }

    /// The key is checked before anything about the tenant is revealed; a
    /// correct key on an expired trial still yields `PaymentRequired`.
    pub async fn verify_tenant_admin(&self, slug: &str, key: &str, now: DateTime<Utc>) -> Result<Tenant, AuthError> {
        self.credentials.verify(slug, key).await?;

        let tenant = self.tenants.find_by_slug(slug).await.map_err(|e| match e {
            TenantError::NotFound(slug) => AuthError::TenantNotFound(slug),
            other => AuthError::Tenant(other),
        })?;
        self.check_access(&tenant, now)?;
        Ok(tenant)
    }

    /// Status checks that apply to every tenant admin request.
    pub fn check_access(&self, tenant: &Tenant, now: DateTime<Utc>) -> Result<(), AuthError> {
        if tenant.status == TenantStatus::Suspended {
            return Err(AuthError::Forbidden(format!("tenant '{}' is suspended", tenant.slug)));
        }
        if compute_status(tenant, now).trial_expired {
            return Err(AuthError::PaymentRequired(tenant.slug.clone()));
        }
        Ok(())
    }

    pub fn validate_new_key(&self, key: &str) -> Result<(), AuthError> {
        if key.chars().count() < self.min_key_length {
            return Err(AuthError::WeakSecret(format!(
                "admin key must be at least {} characters",
                self.min_key_length
            )));
        }
        Ok(())
    }

    /// Pin a session to this tenant instance and its current admin key.
    pub async fn session_scope(&self, tenant: &Tenant) -> Result<TenantScope, AuthError> {
        let credential = self
            .credentials
            .get(&tenant.slug)
            .await
            .ok_or_else(|| AuthError::TenantNotFound(tenant.slug.clone()))?;
        Ok(TenantScope {
            slug: tenant.slug.clone(),
            created_at: tenant.created_at,
            key_epoch: credential.updated_at,
        })
    }

    /// Re-check a session minted under `scope`: the tenant must be the same
    /// instance, its key unchanged since, and its access gate open.
    pub async fn check_session(&self, scope: &TenantScope, now: DateTime<Utc>) -> Result<Tenant, AuthError> {
        let tenant = self.tenants.find_by_slug(&scope.slug).await?;
        let key_epoch = self.credentials.get(&scope.slug).await.map(|c| c.updated_at);
        if tenant.created_at != scope.created_at || key_epoch != Some(scope.key_epoch) {
            tracing::warn!(slug = %scope.slug, "stale tenant session rejected");
            return Err(AuthError::Unauthorized("session is no longer valid, please log in again".to_string()));
        }
        self.check_access(&tenant, now)?;
        Ok(tenant)
    }

    /// Open a reset for every tenant registered under `email`, each with its
    /// own token and its own email naming the tenant.
    ///
    /// Unknown addresses are silently ignored so callers cannot probe for
    /// accounts.
    pub async fn reset_request(&self, email: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let tenants = self.tenants.find_all_by_email(email).await;
        if tenants.is_empty() {
            tracing::info!("password reset requested for unknown email");
            return Ok(());
        }
        for tenant in tenants {
            self.open_reset(&tenant.slug, now).await?;
        }
        Ok(())
    }

    async fn open_reset(&self, slug: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let token = random_token();
        let token_hash = hash_token(&token);
        let expiry = (now + self.reset_ttl).timestamp_millis();

        let tenant = self
            .tenants
            .modify(slug, move |t| {
                t.reset_token_hash = Some(token_hash);
                t.reset_expiry = Some(expiry);
                Ok(())
            })
            .await?;

        let link = format!("{}/admin/reset.html?token={}", self.public_base_url, token);
        let message = OutboundEmail {
            to: tenant.email.clone(),
            subject: format!("Reset your {} admin key", tenant.funeral_home_name),
            body: format!(
                "A reset of the admin key for {} (tenant '{}') was requested.\n\nReset token: {}\nOr follow: {}\n\nThis token expires in {} minutes. If you did not ask for this, ignore this email.\n",
                tenant.funeral_home_name,
                tenant.slug,
                token,
                link,
                self.reset_ttl.num_minutes()
            ),
        };
        deliver(&self.mailer, message).await;

        tracing::info!(slug = %tenant.slug, "password reset opened");
        Ok(())
    }

    /// Redeem a reset token, replacing the tenant's admin key.
    pub async fn reset_confirm(&self, token: &str, new_key: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        self.validate_new_key(new_key)?;

        let token_hash = hash_token(token.trim());
        let matching = self.tenants.list().await.into_iter().find(|t| {
            t.reset_token_hash
                .as_deref()
                .is_some_and(|stored| constant_time_eq(stored, &token_hash))
        });
        let Some(tenant) = matching else {
            return Err(AuthError::InvalidOrExpired);
        };

        let now_ms = now.timestamp_millis();
        if tenant.reset_expiry.map_or(true, |expiry| now_ms > expiry) {
            self.clear_reset(&tenant.slug, &token_hash).await?;
            return Err(AuthError::InvalidOrExpired);
        }

        self.credentials.set_key(&tenant.slug, new_key, now).await?;
        self.clear_reset(&tenant.slug, &token_hash).await?;

        tracing::info!(slug = %tenant.slug, "admin key reset");
        Ok(tenant.slug)
    }

    async fn clear_reset(&self, slug: &str, token_hash: &str) -> Result<(), AuthError> {
        let token_hash = token_hash.to_string();
        self.tenants
            .modify(slug, move |t| {
                // Only clear if no newer reset replaced this one meanwhile.
                if t.reset_token_hash.as_deref() == Some(token_hash.as_str()) {
                    t.reset_token_hash = None;
                    t.reset_expiry = None;
                }
                Ok(())
            })
            .await?;
        Ok(())
    }
}
