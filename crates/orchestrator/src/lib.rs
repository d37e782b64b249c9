//! Webhook orchestrator for the menu chatbot.
//!
//! This crate provides the [`WebhookOrchestrator`] type which turns an inbound
//! gateway webhook into a reply and a saved conversation state.
//!
//! # Architecture
//!
//! ```text
//! Webhook payload (from webhook-server)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Parse envelope, skip non-messages and own messages      │
//! │         ↓                                                   │
//! │  2. Find the account owning the instance                    │
//! │         ↓                                                   │
//! │  3. Load config, menus, options, triggers, variables,       │
//! │     contact and credentials concurrently                    │
//! │         ↓                                                   │
//! │  4. Skip disabled accounts, groups, contacts with a human   │
//! │         ↓                                                   │
//! │  5. Resolve the reply (menu-engine)                         │
//! │         ↓                                                   │
//! │  6. Typing delay, then send text or image                   │
//! │         ↓                                                   │
//! │  7. Save contact state and interaction log concurrently     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use chatbot_database::Database;
//! use orchestrator::WebhookOrchestrator;
//! use whatsapp_gateway::GatewayClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:chatbot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let gateway = GatewayClient::new(Duration::from_secs(15))?;
//!     let orchestrator = WebhookOrchestrator::new(db, gateway);
//!
//!     let payload = serde_json::json!({"event": "messages.upsert"});
//!     let response = orchestrator.handle(&payload).await?;
//!     println!("{:?}", response.status);
//!     Ok(())
//! }
//! ```

mod error;
mod orchestrator;
mod outcome;
mod sender;
mod store;

// Public exports
pub use error::OrchestratorError;
pub use orchestrator::WebhookOrchestrator;
pub use outcome::{
    WebhookResponse, WebhookStatus, REASON_API_NOT_CONFIGURED, REASON_AWAITING_HUMAN,
    REASON_DISABLED, REASON_GROUP, REASON_INSTANCE_NOT_FOUND, REASON_OWN_MESSAGE,
};
pub use sender::ReplyGateway;
pub use store::ChatbotStore;

// Re-export commonly used types from dependencies
pub use chatbot_database::{Contact, ContactUpdate, GatewayCredentials, NewContact, NewInteractionLog};
pub use whatsapp_gateway::GatewayConfig;
