//! Error types for orchestrator operations.

use chatbot_database::DatabaseError;
use thiserror::Error;

/// Errors that abort webhook processing.
///
/// Ignorable payloads and configuration problems are not errors; they are
/// reported through [`crate::WebhookResponse`].
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A store read or write failed.
    #[error("store error: {0}")]
    Store(String),

    /// The contact's new state could not be saved, even after a retry.
    #[error("failed to persist contact {phone}: {reason}")]
    ContactPersistence { phone: String, reason: String },
}

impl From<DatabaseError> for OrchestratorError {
    fn from(e: DatabaseError) -> Self {
        Self::Store(e.to_string())
    }
}
