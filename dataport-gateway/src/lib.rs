//! HTTP invocation endpoint for dataport.
//!
//! Accepts a JSON invocation naming a source catalog, a target catalog, a
//! package and a step (`display` or `replicate`), runs it, and answers with
//! a permissive cross-origin header on every response.

mod error;
mod invocation;

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};

pub use error::{GatewayError, GatewayResult};
pub use invocation::{Invocation, InvocationResponse, Step, invoke};

/// Headers attached to every response.
pub(crate) const CORS_HEADERS: [(header::HeaderName, &str); 1] =
    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")];

async fn invoke_handler(payload: Result<Json<Invocation>, JsonRejection>) -> Response {
    let Json(invocation) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return GatewayError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    let package_id = invocation.package_id.clone();
    match invoke(invocation).await {
        Ok(body) => {
            info!("Invocation for {} succeeded", package_id);
            (StatusCode::OK, CORS_HEADERS, Json(body)).into_response()
        }
        Err(e) => {
            warn!("Invocation for {} failed: {}", package_id, e);
            e.into_response()
        }
    }
}

async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "content-type"),
        ],
    )
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, CORS_HEADERS, "ok")
}

/// Build the HTTP API router.
pub fn build_router() -> Router {
    Router::new()
        .route("/", post(invoke_handler).options(preflight_handler))
        .route(
            "/api/v1/invoke",
            post(invoke_handler).options(preflight_handler),
        )
        .route("/health", get(health_handler))
}
