//! Error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body is not JSON.
    #[error("Invalid JSON")]
    InvalidJson,

    /// Webhook processing failed.
    #[error("{0}")]
    Orchestrator(#[from] orchestrator::OrchestratorError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Invalid JSON" }),
            ),
            ServerError::Orchestrator(err) => {
                tracing::error!("Webhook processing failed: {}", err);
                internal(err.to_string())
            }
            ServerError::Database(err) => {
                tracing::error!("Database error: {}", err);
                internal(err.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal(message: String) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "status": "error", "message": message }),
    )
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ServerError>;
