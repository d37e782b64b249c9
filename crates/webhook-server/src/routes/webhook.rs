//! Inbound webhook endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use orchestrator::WebhookResponse;
use serde_json::Value;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Process a gateway webhook.
///
/// The body is read raw so malformed JSON gets the `400` answer the gateway
/// expects instead of axum's rejection.
pub async fn receive(State(state): State<AppState>, body: Bytes) -> Result<Json<WebhookResponse>> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejecting webhook body: {}", e);
        ServerError::InvalidJson
    })?;

    let response = state.orchestrator.handle(&payload).await?;
    Ok(Json(response))
}

