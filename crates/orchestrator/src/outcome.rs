//! Webhook outcomes reported back to the gateway.

use menu_engine::Resolution;
use serde::{Deserialize, Serialize};

/// Ignore reasons.
pub const REASON_OWN_MESSAGE: &str = "Own message";
pub const REASON_DISABLED: &str = "Chatbot disabled";
pub const REASON_GROUP: &str = "Group message";
pub const REASON_AWAITING_HUMAN: &str = "Awaiting human";

/// Configuration error reasons.
pub const REASON_INSTANCE_NOT_FOUND: &str = "Instance not found";
pub const REASON_API_NOT_CONFIGURED: &str = "API not configured";

/// Overall result of a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    /// Nothing to do for this payload.
    Ignored,
    /// The account is not set up to answer.
    Error,
    /// A reply was accepted by the gateway.
    Sent,
    /// The reply could not be delivered; state was still saved.
    Failed,
}

/// JSON body answered to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub status: WebhookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_matched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_human: Option<bool>,
}

impl WebhookResponse {
    fn with_reason(status: WebhookStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
            menu_key: None,
            trigger_matched: None,
            is_fallback: None,
            is_human: None,
        }
    }

    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::with_reason(WebhookStatus::Ignored, reason)
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::with_reason(WebhookStatus::Error, reason)
    }

    /// Outcome of a processed message.
    pub fn processed(sent: bool, resolution: &Resolution) -> Self {
        Self {
            status: if sent {
                WebhookStatus::Sent
            } else {
                WebhookStatus::Failed
            },
            reason: None,
            menu_key: Some(resolution.next_menu_key.clone()),
            trigger_matched: resolution.matched_trigger.clone(),
            is_fallback: Some(resolution.is_fallback),
            is_human: Some(resolution.handoff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ignored_serialization() {
        let json = serde_json::to_value(WebhookResponse::ignored(REASON_DISABLED)).unwrap();
        assert_eq!(json, json!({"status": "ignored", "reason": "Chatbot disabled"}));
    }

    #[test]
    fn test_processed_serialization() {
        let resolution = Resolution {
            reply: "Planos".into(),
            image_url: None,
            next_menu_key: "plans".into(),
            matched_trigger: None,
            is_fallback: false,
            handoff: false,
        };
        let json = serde_json::to_value(WebhookResponse::processed(false, &resolution)).unwrap();
        assert_eq!(
            json,
            json!({"status": "failed", "menuKey": "plans", "isFallback": false, "isHuman": false})
        );
    }
}
