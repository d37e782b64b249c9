//! WhatsApp gateway client library.
//!
//! This crate provides a Rust client for an Evolution-style WhatsApp HTTP
//! gateway. It supports:
//!
//! - Simulating a "composing" presence before a reply
//! - Sending text messages, retrying alternate recipient encodings on rejection
//! - Sending images with a caption
//! - Parsing inbound webhook payloads in the shapes the gateway emits
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use whatsapp_gateway::{GatewayClient, GatewayConfig};
//!
//! # async fn example() -> Result<(), whatsapp_gateway::GatewayError> {
//! let client = GatewayClient::new(Duration::from_secs(15))?;
//! let endpoint = GatewayConfig::new("https://gateway.example.com", "token", "loja-azul");
//!
//! client.simulate_typing(&endpoint, "11999999999", Duration::from_secs(2)).await;
//! let sent = client.send_text(&endpoint, "11999999999", "Olá!").await;
//! println!("delivered: {}", sent);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod phone;
pub mod types;

pub use client::{preview, GatewayClient, DEFAULT_TIMEOUT};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use phone::{alternate_recipients, format_phone, is_group_jid, phone_from_jid};
pub use types::*;
