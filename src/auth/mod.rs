pub mod secret;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::tenant_service::TenantError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("tenant '{0}' not found")]
    TenantNotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("trial period for '{0}' has expired")]
    PaymentRequired(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("token expired")]
    TokenExpired,
    #[error("reset token is invalid or has expired")]
    InvalidOrExpired,
    #[error("{0}")]
    WeakSecret(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("signing secret is not configured")]
    InvalidSecret,
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error(transparent)]
    Tenant(#[from] TenantError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    TenantAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Which tenant instance, and which admin key, a tenant session was minted under.
/// A deleted-and-recreated tenant or a reset key leaves older sessions dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantScope {
    pub slug: String,
    pub created_at: i64,
    pub key_epoch: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Superadmin email or tenant slug.
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantScope>,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Mints and verifies HS256 tokens. Stateless: nothing is kept server side,
/// so sessions survive restarts for as long as the secret does.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn issue(
        &self,
        sub: &str,
        role: Role,
        tenant: Option<&TenantScope>,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: sub.to_string(),
            role,
            tenant: tenant.cloned(),
            typ: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
    }

    pub fn issue_pair(
        &self,
        sub: &str,
        role: Role,
        tenant: Option<&TenantScope>,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            token: self.issue(sub, role, tenant, TokenKind::Access, now)?,
            refresh_token: self.issue(sub, role, tenant, TokenKind::Refresh, now)?,
            expires_in: self.access_seconds(),
        })
    }

    pub fn access_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Verify signature and expiry, and that the token is of the expected kind.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::Unauthorized(format!("invalid token: {e}")),
            })?;

        if claims.typ != kind {
            return Err(AuthError::Unauthorized("wrong token type".to_string()));
        }
        Ok(claims)
    }
}
