use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

use crate::error::PassforgeError;
use crate::server::middleware::ResponseFormat;
use crate::server::views::HtmlError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health -> static liveness payload.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /favicon.ico -> 204 so browsers stop asking.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri, format: ResponseFormat) -> Response {
    debug!(path = %uri.path(), "no route matched");
    match format {
        ResponseFormat::Html => HtmlError(PassforgeError::NotFound).into_response(),
        ResponseFormat::Json => PassforgeError::NotFound.into_response(),
    }
}

/// Known path, unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri, format: ResponseFormat) -> Response {
    debug!(%method, path = %uri.path(), "method not allowed");
    match format {
        ResponseFormat::Html => HtmlError(PassforgeError::MethodNotAllowed).into_response(),
        ResponseFormat::Json => PassforgeError::MethodNotAllowed.into_response(),
    }
}
