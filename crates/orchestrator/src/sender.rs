//! Reply gateway trait and implementations.

use std::time::Duration;

use async_trait::async_trait;
use whatsapp_gateway::{GatewayClient, GatewayConfig};

/// Trait for delivering replies and typing indicators.
///
/// Abstracted to support different transports (the HTTP gateway, tests,
/// etc.). Every call reports success as `bool` and never fails the request.
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    /// Show "composing" for `duration` and wait it out.
    async fn simulate_typing(&self, endpoint: &GatewayConfig, phone: &str, duration: Duration)
        -> bool;

    /// Send a text message.
    async fn send_text(&self, endpoint: &GatewayConfig, phone: &str, text: &str) -> bool;

    /// Send an image with `caption`.
    async fn send_image(
        &self,
        endpoint: &GatewayConfig,
        phone: &str,
        caption: &str,
        image_url: &str,
    ) -> bool;
}

#[async_trait]
impl ReplyGateway for GatewayClient {
    async fn simulate_typing(
        &self,
        endpoint: &GatewayConfig,
        phone: &str,
        duration: Duration,
    ) -> bool {
        GatewayClient::simulate_typing(self, endpoint, phone, duration).await
    }

    async fn send_text(&self, endpoint: &GatewayConfig, phone: &str, text: &str) -> bool {
        GatewayClient::send_text(self, endpoint, phone, text).await
    }

    async fn send_image(
        &self,
        endpoint: &GatewayConfig,
        phone: &str,
        caption: &str,
        image_url: &str,
    ) -> bool {
        GatewayClient::send_image(self, endpoint, phone, caption, image_url).await
    }
}
