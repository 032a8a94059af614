// HTTP API Error Types
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::services::collection::CollectionError;
use crate::services::document::DocumentError;
use crate::services::tenant_service::TenantError;
use crate::store::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),
    TokenExpired,

    // 402 Payment Required
    PaymentRequired(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::TokenExpired => 401,
            ApiError::PaymentRequired(_) => 402,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::TokenExpired => "Token expired",
            ApiError::PaymentRequired(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            response["field_errors"] = json!(field_errors);
        }

        response
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::TokenExpired => "token_expired",
            ApiError::PaymentRequired(_) => "TRIAL_EXPIRED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn field_error(field: &str, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), problem.into());
        ApiError::validation_error("Invalid field", Some(field_errors))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn payment_required(message: impl Into<String>) -> Self {
        ApiError::PaymentRequired(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Don't expose filesystem paths to clients
        tracing::error!("Store error: {}", err);
        ApiError::internal_server_error("Failed to persist data")
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(slug) => ApiError::not_found(format!("Tenant '{}' not found", slug)),
            TenantError::AlreadyExists(slug) => ApiError::conflict(format!("Tenant '{}' already exists", slug)),
            TenantError::EmailTaken(_) => ApiError::conflict("A funeral home with this email is already registered"),
            TenantError::Invalid(msg) => ApiError::validation_error(msg, None),
            TenantError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TenantNotFound(slug) => ApiError::not_found(format!("Tenant '{}' not found", slug)),
            AuthError::Forbidden(msg) => ApiError::forbidden(msg),
            AuthError::PaymentRequired(_) => {
                ApiError::payment_required("Trial period has expired. Please upgrade to continue.")
            }
            AuthError::Unauthorized(msg) => ApiError::unauthorized(msg),
            AuthError::TokenExpired => ApiError::TokenExpired,
            AuthError::InvalidOrExpired => ApiError::bad_request("Reset token is invalid or has expired"),
            AuthError::WeakSecret(msg) | AuthError::InvalidInput(msg) => ApiError::validation_error(msg, None),
            AuthError::InvalidSecret | AuthError::Crypto(_) => {
                tracing::error!("Auth backend error: {}", err);
                ApiError::internal_server_error("Authentication is unavailable")
            }
            AuthError::Tenant(e) => e.into(),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::NotFound { kind, id } => ApiError::not_found(format!("{} '{}' not found", kind, id)),
            CollectionError::MissingRequiredField(field) => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), "This field is required".to_string());
                ApiError::validation_error("Missing required fields", Some(field_errors))
            }
            CollectionError::InvalidField { field, reason } => ApiError::field_error(field, reason),
            CollectionError::InvalidTenant(slug) => ApiError::not_found(format!("Tenant '{}' not found", slug)),
            CollectionError::Store(e) => e.into(),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Empty => ApiError::bad_request("Form has no content"),
            DocumentError::Io { .. } | DocumentError::Render(_) => {
                tracing::error!("Document error: {}", err);
                ApiError::internal_server_error("Failed to generate document")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Request body is too large")
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Upload is too large")
        } else {
            ApiError::bad_request(err.body_text())
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_expiry_uses_its_own_code() {
        let err = ApiError::from(AuthError::PaymentRequired("alpha".into()));
        assert_eq!(err.status_code(), 402);
        assert_eq!(err.to_json()["code"], "TRIAL_EXPIRED");
        assert_eq!(err.to_json()["success"], false);
    }

    #[test]
    fn expired_tokens_are_distinct_from_bad_ones() {
        let expired = ApiError::from(AuthError::TokenExpired);
        let invalid = ApiError::from(AuthError::Unauthorized("invalid token".into()));
        assert_eq!(expired.status_code(), 401);
        assert_eq!(invalid.status_code(), 401);
        assert_eq!(expired.error_code(), "token_expired");
        assert_eq!(invalid.error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let err = ApiError::from(CollectionError::MissingRequiredField("fullName"));
        let body = err.to_json();
        assert_eq!(err.status_code(), 400);
        assert_eq!(body["field_errors"]["fullName"], "This field is required");
    }

    #[test]
    fn auth_gate_statuses() {
        assert_eq!(ApiError::from(AuthError::TenantNotFound("x".into())).status_code(), 404);
        assert_eq!(ApiError::from(AuthError::Forbidden("bad key".into())).status_code(), 403);
        assert_eq!(ApiError::from(TenantError::AlreadyExists("x".into())).status_code(), 409);
    }
}
