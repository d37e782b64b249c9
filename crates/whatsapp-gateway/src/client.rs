//! WhatsApp gateway HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::phone::{alternate_recipients, format_phone};
use crate::types::{MediaParams, PresenceParams, TextParams};

/// Default bound for a single gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// How much of a message text to show in logs.
const LOG_PREVIEW_CHARS: usize = 50;

/// Client for the gateway's presence and message endpoints.
///
/// Send operations report success as `bool`; failures are logged and never
/// propagate, so callers can always go on to persist their state.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
}

impl GatewayClient {
    /// Create a client whose calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Http)?;
        Ok(Self { http })
    }

    /// Show "composing" for `duration`, then wait it out.
    ///
    /// The wait happens even when the presence call fails so reply timing
    /// does not depend on the presence endpoint.
    pub async fn simulate_typing(
        &self,
        endpoint: &GatewayConfig,
        phone: &str,
        duration: Duration,
    ) -> bool {
        let params = PresenceParams::composing(format_phone(phone), duration.as_millis() as u64);
        let ok = match self.post(&endpoint.presence_url(), endpoint, &params).await {
            Ok(()) => true,
            Err(e) => {
                warn!(instance = %endpoint.instance, error = %e, "Failed to send typing presence");
                false
            }
        };

        tokio::time::sleep(duration).await;
        ok
    }

    /// Send a text message.
    ///
    /// When the gateway rejects the recipient (HTTP 400) the alternate
    /// encodings from [`alternate_recipients`] are tried in order.
    pub async fn send_text(&self, endpoint: &GatewayConfig, phone: &str, text: &str) -> bool {
        let formatted = format_phone(phone);
        info!(
            instance = %endpoint.instance,
            to = %formatted,
            "Sending text: {}",
            preview(text)
        );

        let url = endpoint.send_text_url();
        let params = TextParams::new(&formatted, text);

        match self.post(&url, endpoint, &params).await {
            Ok(()) => return true,
            Err(e) if e.is_malformed_recipient() => {
                debug!(to = %formatted, "Recipient rejected, trying alternate formats");
            }
            Err(e) => {
                warn!(to = %formatted, error = %e, "sendText failed");
                return false;
            }
        }

        for alternate in alternate_recipients(&formatted) {
            match self.post(&url, endpoint, &params.with_number(&alternate)).await {
                Ok(()) => {
                    info!(to = %alternate, "Sent using alternate recipient format");
                    return true;
                }
                Err(e) => debug!(to = %alternate, error = %e, "Alternate recipient failed"),
            }
        }

        warn!(to = %formatted, "sendText failed for all recipient formats");
        false
    }

    /// Send an image with a caption. Single attempt.
    pub async fn send_image(
        &self,
        endpoint: &GatewayConfig,
        phone: &str,
        caption: &str,
        image_url: &str,
    ) -> bool {
        let formatted = format_phone(phone);
        info!(instance = %endpoint.instance, to = %formatted, image = %image_url, "Sending image");

        let params = MediaParams::image(&formatted, image_url, caption);
        match self.post(&endpoint.send_media_url(), endpoint, &params).await {
            Ok(()) => true,
            Err(e) => {
                warn!(to = %formatted, error = %e, "sendMedia failed");
                false
            }
        }
    }

    async fn post<P: Serialize>(
        &self,
        url: &str,
        endpoint: &GatewayConfig,
        params: &P,
    ) -> Result<(), GatewayError> {
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("apikey", &endpoint.api_token)
            .json(params)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient").finish_non_exhaustive()
    }
}

/// Shorten a message text for log lines.
pub fn preview(text: &str) -> String {
    if text.chars().count() > LOG_PREVIEW_CHARS {
        let cut: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
