//! Inbound webhook payloads.
//!
//! The gateway emits message events in a few envelope shapes. Each shape has
//! a named adapter ([`PayloadShape`]) picked by a structural test, and all of
//! them produce the same [`InboundMessage`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::phone::{is_group_jid, phone_from_jid};

/// Event name fragments that identify a received message.
pub const MESSAGE_EVENTS: &[&str] = &["messages.upsert", "message", "message.received"];

/// Supported envelope shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `{"event": …, "instance": …, "data": {"key": …, "message": …}}`
    Data,
    /// `{"type": …, "instanceName": …, "message": {"key": …, "message": …}}`
    Message,
    /// `{…, "messages": [{"key": …, "message": …}]}`
    Batch,
}

impl PayloadShape {
    /// Pick the adapter for a payload.
    pub fn detect(payload: &Value) -> Option<Self> {
        let has_key = |v: &Value| v.get("key").is_some_and(Value::is_object);

        if payload.get("data").is_some_and(has_key) {
            Some(Self::Data)
        } else if payload.get("message").is_some_and(has_key) {
            Some(Self::Message)
        } else if payload
            .get("messages")
            .and_then(Value::as_array)
            .is_some_and(|m| !m.is_empty())
        {
            Some(Self::Batch)
        } else {
            None
        }
    }

    /// The raw message object for this shape.
    fn container<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        match self {
            Self::Data => payload.get("data"),
            Self::Message => payload.get("message"),
            Self::Batch => payload.get("messages").and_then(|m| m.get(0)),
        }
    }

    /// Decode the message carried by the payload.
    pub fn extract(&self, payload: &Value) -> Option<WireMessage> {
        let container = self.container(payload)?;
        match WireMessage::deserialize(container) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(shape = ?self, error = %e, "Message container did not decode");
                None
            }
        }
    }
}

/// A message as the gateway serializes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default)]
    pub key: MessageKey,
    /// Sender's WhatsApp display name.
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

/// Addressing information of a message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    /// Conversation JID (`<phone>@s.whatsapp.net` or `<id>@g.us`).
    #[serde(default)]
    pub remote_jid: Option<String>,
    /// Sent by the instance itself. Anything other than a boolean reads as false.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub from_me: bool,
    #[serde(default)]
    pub id: Option<String>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Message body variants we read text from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text_message: Option<ExtendedText>,
}

/// A text message with link preview or quote metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedText {
    #[serde(default)]
    pub text: Option<String>,
}

impl WireMessage {
    /// Text body, from `conversation` or `extendedTextMessage.text`.
    pub fn text(&self) -> Option<&str> {
        let content = self.message.as_ref()?;
        content
            .conversation
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                content
                    .extended_text_message
                    .as_ref()
                    .and_then(|e| e.text.as_deref())
                    .filter(|t| !t.is_empty())
            })
    }
}

/// Envelope-level view of a webhook payload.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event name (`event` or `type`), empty if absent.
    pub event: String,
    /// Gateway instance that received the message.
    pub instance: Option<String>,
    /// Adapter that matched the payload.
    pub shape: Option<PayloadShape>,
    /// Decoded message, if the payload carried one.
    pub message: Option<WireMessage>,
}

/// Why a payload does not describe a message the chatbot should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadRejection {
    NotMessageEvent,
    MissingRoute,
    NoText,
}

impl PayloadRejection {
    /// Reason string reported back to the gateway.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotMessageEvent => "Not a message event",
            Self::MissingRoute => "No remoteJid or instance",
            Self::NoText => "No text content",
        }
    }
}

/// A received text message, normalized across payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub instance: String,
    pub remote_jid: String,
    /// Digits of the sender's JID.
    pub phone: String,
    pub text: String,
    /// Display name, empty when unknown.
    pub push_name: String,
    pub from_me: bool,
    pub is_group: bool,
}

impl WebhookEvent {
    /// Read the envelope fields of a payload.
    pub fn parse(payload: &Value) -> Self {
        let str_field = |v: Option<&Value>| {
            v.and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let event = str_field(payload.get("event"))
            .or_else(|| str_field(payload.get("type")))
            .unwrap_or_default();

        let instance = str_field(payload.get("instance"))
            .or_else(|| str_field(payload.get("instanceName")))
            .or_else(|| str_field(payload.pointer("/data/instance/instanceName")));

        let shape = PayloadShape::detect(payload);
        let message = shape.and_then(|s| s.extract(payload));

        Self {
            event,
            instance,
            shape,
            message,
        }
    }

    /// Whether the event name denotes a received message.
    pub fn is_message_event(&self) -> bool {
        let event = self.event.to_lowercase();
        MESSAGE_EVENTS.iter().any(|e| event.contains(e))
    }

    /// Turn the event into an inbound message, or say why it is not one.
    pub fn into_message(self) -> Result<InboundMessage, PayloadRejection> {
        if !self.is_message_event() {
            return Err(PayloadRejection::NotMessageEvent);
        }

        let message = self.message.unwrap_or_default();
        let (Some(remote_jid), Some(instance)) =
            (message.key.remote_jid.clone().filter(|j| !j.is_empty()), self.instance)
        else {
            return Err(PayloadRejection::MissingRoute);
        };

        // Broadcast and status JIDs carry no phone digits.
        let phone = phone_from_jid(&remote_jid);
        if phone.is_empty() {
            return Err(PayloadRejection::MissingRoute);
        }

        let text = message
            .text()
            .map(str::to_string)
            .ok_or(PayloadRejection::NoText)?;

        Ok(InboundMessage {
            phone,
            is_group: is_group_jid(&remote_jid),
            instance,
            remote_jid,
            text,
            push_name: message.push_name.unwrap_or_default(),
            from_me: message.key.from_me,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data_payload() -> Value {
        json!({
            "event": "messages.upsert",
            "instance": "loja-azul",
            "data": {
                "key": {"remoteJid": "5511999999999@s.whatsapp.net", "fromMe": false, "id": "ABC"},
                "pushName": "Maria",
                "message": {"conversation": "Oi"}
            }
        })
    }

    #[test]
    fn test_data_shape() {
        let event = WebhookEvent::parse(&data_payload());
        assert_eq!(event.shape, Some(PayloadShape::Data));

        let msg = event.into_message().unwrap();
        assert_eq!(msg.instance, "loja-azul");
        assert_eq!(msg.phone, "5511999999999");
        assert_eq!(msg.text, "Oi");
        assert_eq!(msg.push_name, "Maria");
        assert!(!msg.from_me);
        assert!(!msg.is_group);
    }

    #[test]
    fn test_message_shape_with_extended_text() {
        let payload = json!({
            "type": "message",
            "instanceName": "loja-azul",
            "message": {
                "key": {"remoteJid": "5511888888888@s.whatsapp.net"},
                "message": {"extendedTextMessage": {"text": "veja https://x.com"}}
            }
        });
        let event = WebhookEvent::parse(&payload);
        assert_eq!(event.shape, Some(PayloadShape::Message));

        let msg = event.into_message().unwrap();
        assert_eq!(msg.text, "veja https://x.com");
        assert_eq!(msg.push_name, "");
    }

    #[test]
    fn test_batch_shape_with_nested_instance() {
        let payload = json!({
            "event": "MESSAGE.RECEIVED",
            "data": {"instance": {"instanceName": "loja-azul"}},
            "messages": [{
                "key": {"remoteJid": "120363025@g.us", "fromMe": false},
                "message": {"conversation": "1"}
            }]
        });
        let event = WebhookEvent::parse(&payload);
        assert_eq!(event.shape, Some(PayloadShape::Batch));

        let msg = event.into_message().unwrap();
        assert_eq!(msg.instance, "loja-azul");
        assert!(msg.is_group);
    }

    #[test]
    fn test_non_message_event() {
        let payload = json!({"event": "connection.update", "instance": "x", "data": {}});
        let err = WebhookEvent::parse(&payload).into_message().unwrap_err();
        assert_eq!(err, PayloadRejection::NotMessageEvent);
        assert_eq!(err.reason(), "Not a message event");
    }

    #[test]
    fn test_missing_instance() {
        let mut payload = data_payload();
        payload.as_object_mut().unwrap().remove("instance");
        let err = WebhookEvent::parse(&payload).into_message().unwrap_err();
        assert_eq!(err, PayloadRejection::MissingRoute);
    }

    #[test]
    fn test_missing_text() {
        let payload = json!({
            "event": "messages.upsert",
            "instance": "x",
            "data": {
                "key": {"remoteJid": "5511999999999@s.whatsapp.net"},
                "message": {"imageMessage": {"url": "https://x"}}
            }
        });
        let err = WebhookEvent::parse(&payload).into_message().unwrap_err();
        assert_eq!(err, PayloadRejection::NoText);
    }

    #[test]
    fn test_from_me_flag() {
        let mut payload = data_payload();
        payload["data"]["key"]["fromMe"] = json!(true);
        let msg = WebhookEvent::parse(&payload).into_message().unwrap();
        assert!(msg.from_me);
    }

    #[test]
    fn test_status_broadcast_has_no_route() {
        let payload = json!({
            "event": "messages.upsert",
            "instance": "x",
            "data": {
                "key": {"remoteJid": "status@broadcast"},
                "message": {"extendedTextMessage": {"text": "bom dia"}}
            }
        });
        let err = WebhookEvent::parse(&payload).into_message().unwrap_err();
        assert_eq!(err, PayloadRejection::MissingRoute);
    }

    #[test]
    fn test_null_from_me_reads_as_false() {
        let mut payload = data_payload();
        payload["data"]["key"]["fromMe"] = Value::Null;
        let msg = WebhookEvent::parse(&payload).into_message().unwrap();
        assert!(!msg.from_me);
        assert_eq!(msg.phone, "5511999999999");

        payload["data"]["key"]["fromMe"] = json!("yes");
        let msg = WebhookEvent::parse(&payload).into_message().unwrap();
        assert!(!msg.from_me);
    }

    #[test]
    fn test_unknown_shape() {
        let payload = json!({"event": "messages.upsert", "instance": "x", "foo": 1});
        let event = WebhookEvent::parse(&payload);
        assert_eq!(event.shape, None);
        assert_eq!(event.into_message().unwrap_err(), PayloadRejection::MissingRoute);
    }
}
