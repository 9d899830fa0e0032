use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum PassforgeError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] SqlxError),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for PassforgeError {
    fn from(e: figment::Error) -> Self {
        PassforgeError::Config(Box::new(e))
    }
}

impl PassforgeError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PassforgeError::InvalidConfiguration(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PassforgeError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            PassforgeError::NotFound => StatusCode::NOT_FOUND,
            PassforgeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            PassforgeError::StorageUnavailable(_)
            | PassforgeError::Corrupt(_)
            | PassforgeError::Config(_)
            | PassforgeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body code plus the message safe to show to a caller.
    ///
    /// Server-side failures are logged here and replaced with a generic message.
    pub fn public_parts(&self) -> (&'static str, String) {
        match self {
            PassforgeError::InvalidConfiguration(msg) => ("INVALID_CONFIGURATION", msg.clone()),
            PassforgeError::NotFound => ("NOT_FOUND", "Page not found".to_string()),
            PassforgeError::MethodNotAllowed => {
                ("METHOD_NOT_ALLOWED", "Method not allowed".to_string())
            }
            PassforgeError::StorageUnavailable(_) | PassforgeError::Corrupt(_) => {
                error!(error = %self, "storage failure while serving request");
                (
                    "STORAGE_UNAVAILABLE",
                    "Password storage is currently unavailable.".to_string(),
                )
            }
            PassforgeError::Config(_) | PassforgeError::Io(_) => {
                error!(error = %self, "internal failure while serving request");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred.".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for PassforgeError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let (code, message) = self.public_parts();
        (
            status,
            Json(ApiErrorResponse {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: &'static str,
}
