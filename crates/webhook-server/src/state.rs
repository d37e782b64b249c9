//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use orchestrator::WebhookOrchestrator;
use whatsapp_gateway::GatewayClient;

/// Orchestrator wired to the SQLite store and the HTTP gateway.
pub type ChatbotOrchestrator = WebhookOrchestrator<Database, GatewayClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Webhook pipeline.
    pub orchestrator: Arc<ChatbotOrchestrator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, gateway: GatewayClient) -> Self {
        let orchestrator = Arc::new(WebhookOrchestrator::new(db.clone(), gateway));
        Self { db, orchestrator }
    }
}
