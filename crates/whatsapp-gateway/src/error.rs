//! Error types for whatsapp-gateway.

use thiserror::Error;

/// Errors that can occur when talking to the WhatsApp gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (connection, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("gateway rejected request with {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl GatewayError {
    /// Whether the gateway rejected the recipient encoding (HTTP 400).
    pub fn is_malformed_recipient(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if *status == reqwest::StatusCode::BAD_REQUEST.as_u16())
    }
}
