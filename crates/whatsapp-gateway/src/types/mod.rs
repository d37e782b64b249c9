//! Wire types exchanged with the gateway.

pub mod send;
pub mod webhook;

pub use send::{MediaParams, PresenceParams, TextParams};
pub use webhook::{InboundMessage, PayloadRejection, PayloadShape, WebhookEvent, WireMessage};
