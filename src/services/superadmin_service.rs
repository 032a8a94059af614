use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::auth::secret::{hash_secret, verify_secret};
use crate::auth::{AuthError, Claims, Role, TokenIssuer, TokenKind, TokenPair};
use crate::models::SuperadminAccount;
use crate::services::credential_service::AdminAuthService;
use crate::store::JsonStore;

const SUPERADMINS_FILE: &str = "superadmins.json";
const MIN_PASSWORD_LEN: usize = 8;

/// Identity attached to requests that passed the superadmin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperadminIdentity {
    pub email: String,
}

/// Sessions for platform operators, plus token refresh for every role.
#[derive(Clone)]
pub struct SessionService {
    store: JsonStore,
    path: PathBuf,
    issuer: TokenIssuer,
    admin_auth: AdminAuthService,
}

impl SessionService {
    pub fn new(store: JsonStore, issuer: TokenIssuer, admin_auth: AdminAuthService) -> Self {
        let path = store.path(SUPERADMINS_FILE);
        Self {
            store,
            path,
            issuer,
            admin_auth,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub async fn accounts(&self) -> Vec<SuperadminAccount> {
        self.store.read(&self.path, Vec::new()).await
    }

    /// Create or replace the account for `email`.
    pub async fn add_account(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<SuperadminAccount, AuthError> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AuthError::InvalidInput(format!("'{email}' is not a valid email address")));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakSecret(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let account = SuperadminAccount {
            email,
            password_hash: hash_secret(password)?,
            created_at: now.timestamp_millis(),
        };
        let stored = account.clone();
        self.store
            .update(&self.path, Vec::<SuperadminAccount>::new(), move |accounts| {
                accounts.retain(|a| a.email != stored.email);
                accounts.push(stored);
                Ok::<_, AuthError>(())
            })
            .await?;

        tracing::info!(email = %account.email, "superadmin account saved");
        Ok(account)
    }

    /// Seed the first operator account; a no-op once any account exists.
    pub async fn bootstrap(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<bool, AuthError> {
        if !self.accounts().await.is_empty() {
            return Ok(false);
        }
        self.add_account(email, password, now).await?;
        Ok(true)
    }

    pub async fn issue_superadmin_session(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let email = email.trim().to_lowercase();
        let account = self.accounts().await.into_iter().find(|a| a.email == email);

        let verified = match &account {
            Some(account) => verify_secret(password, &account.password_hash)?,
            None => false,
        };
        if !verified {
            tracing::warn!(email = %email, "superadmin login rejected");
            return Err(AuthError::Unauthorized("invalid email or password".to_string()));
        }

        tracing::info!(email = %email, "superadmin logged in");
        self.issuer.issue_pair(&email, Role::Superadmin, None, now)
    }

    /// Log a tenant admin in with their key, yielding a tenant-scoped session.
    pub async fn issue_tenant_session(&self, slug: &str, key: &str, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        match self.admin_auth.verify_tenant_admin(slug, key, now).await {
            Ok(tenant) => {
                let scope = self.admin_auth.session_scope(&tenant).await?;
                tracing::info!(slug = %tenant.slug, "tenant admin logged in");
                self.issuer.issue_pair(&tenant.slug, Role::TenantAdmin, Some(&scope), now)
            }
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "tenant admin login rejected");
                Err(e)
            }
        }
    }

    pub fn require_superadmin(&self, token: &str) -> Result<SuperadminIdentity, AuthError> {
        let claims = self.issuer.verify(token, TokenKind::Access)?;
        if claims.role != Role::Superadmin {
            return Err(AuthError::Unauthorized("superadmin token required".to_string()));
        }
        Ok(SuperadminIdentity { email: claims.sub })
    }

    /// Access claims for a tenant admin of `slug`. The session must belong to
    /// the live tenant instance and its current key, and the trial gate is
    /// re-checked.
    pub async fn require_tenant_admin(&self, token: &str, slug: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = self.issuer.verify(token, TokenKind::Access)?;
        if claims.role != Role::TenantAdmin {
            return Err(AuthError::Unauthorized("tenant admin token required".to_string()));
        }
        let scope = match &claims.tenant {
            Some(scope) if scope.slug == slug => scope,
            _ => return Err(AuthError::Forbidden("token is not valid for this tenant".to_string())),
        };

        self.admin_auth.check_session(scope, now).await?;
        Ok(claims)
    }

    /// Trade a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        let claims = self.issuer.verify(refresh_token, TokenKind::Refresh)?;

        if claims.role == Role::TenantAdmin {
            let scope = claims
                .tenant
                .as_ref()
                .ok_or_else(|| AuthError::Unauthorized("tenant claim missing".to_string()))?;
            self.admin_auth.check_session(scope, now).await?;
        } else if !self.accounts().await.iter().any(|a| a.email == claims.sub) {
            return Err(AuthError::Unauthorized("account no longer exists".to_string()));
        }

        let token = self
            .issuer
            .issue(&claims.sub, claims.role, claims.tenant.as_ref(), TokenKind::Access, now)?;
        Ok(TokenPair {
            token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.issuer.access_seconds(),
        })
    }
}
