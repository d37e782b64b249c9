//! Request bodies for the outbound gateway endpoints.

use serde::Serialize;

/// Body of a presence update (`chat/sendPresence`).
#[derive(Debug, Clone, Serialize)]
pub struct PresenceParams {
    /// Formatted recipient number.
    pub number: String,
    /// Presence state, e.g. `composing`.
    pub presence: &'static str,
    /// How long the presence should last, in milliseconds.
    pub delay: u64,
}

impl PresenceParams {
    /// Create a "composing" presence lasting `delay_ms`.
    pub fn composing(number: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            number: number.into(),
            presence: "composing",
            delay: delay_ms,
        }
    }
}

/// Body of a text message (`message/sendText`).
#[derive(Debug, Clone, Serialize)]
pub struct TextParams {
    /// Recipient number or JID.
    pub number: String,
    /// The message text.
    pub text: String,
}

impl TextParams {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }

    /// Same text addressed to a different recipient encoding.
    pub fn with_number(&self, number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: self.text.clone(),
        }
    }
}

/// Body of a media message (`message/sendMedia`).
#[derive(Debug, Clone, Serialize)]
pub struct MediaParams {
    /// Recipient number.
    pub number: String,
    /// Media kind, `image` for menu pictures.
    pub mediatype: &'static str,
    /// Public URL of the media.
    pub media: String,
    /// Caption shown under the media.
    pub caption: String,
}

impl MediaParams {
    /// Create an image message with a caption.
    pub fn image(
        number: impl Into<String>,
        url: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            mediatype: "image",
            media: url.into(),
            caption: caption.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_serialization() {
        let json = serde_json::to_value(PresenceParams::composing("5511999999999", 3000)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"number": "5511999999999", "presence": "composing", "delay": 3000})
        );
    }

    #[test]
    fn test_media_serialization() {
        let json =
            serde_json::to_value(MediaParams::image("5511999999999", "https://cdn/x.png", "Oi"))
                .unwrap();
        assert_eq!(json["mediatype"], "image");
        assert_eq!(json["media"], "https://cdn/x.png");
        assert_eq!(json["caption"], "Oi");
    }
}
