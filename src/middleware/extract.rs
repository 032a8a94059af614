use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json` that reports malformed or unknown input through `ApiError`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
