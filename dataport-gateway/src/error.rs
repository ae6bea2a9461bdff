//! Gateway error types and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dataport_catalog::CatalogError;
use dataport_replicate::ReplicateError;
use serde_json::json;
use thiserror::Error;

use crate::CORS_HEADERS;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced to invocation callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The invocation named a step this service does not perform.
    #[error("unsupported step: {0}")]
    InvalidStep(String),

    /// The invocation body could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A catalog handle could not be built or a call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Replication or display failed.
    #[error(transparent)]
    Replicate(#[from] ReplicateError),
}

impl GatewayError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidStep(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Catalog(CatalogError::Config(_)) => StatusCode::BAD_REQUEST,
            GatewayError::Catalog(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            GatewayError::Replicate(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            GatewayError::Catalog(_) | GatewayError::Replicate(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), CORS_HEADERS, body).into_response()
    }
}
