//! Endpoint configuration for the gateway.

/// Where and as whom to call the gateway for one instance.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway, already normalized (no `/manager`, no trailing slash).
    pub base_url: String,
    /// Access token sent in the `apikey` header.
    pub api_token: String,
    /// Gateway instance that owns the WhatsApp session.
    pub instance: String,
}

impl GatewayConfig {
    /// Create a new configuration, normalizing the base URL.
    pub fn new(
        base_url: impl AsRef<str>,
        api_token: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            api_token: api_token.into(),
            instance: instance.into(),
        }
    }

    /// Get the presence endpoint URL.
    pub fn presence_url(&self) -> String {
        self.endpoint("chat/sendPresence")
    }

    /// Get the text message endpoint URL.
    pub fn send_text_url(&self) -> String {
        self.endpoint("message/sendText")
    }

    /// Get the media message endpoint URL.
    pub fn send_media_url(&self) -> String {
        self.endpoint("message/sendMedia")
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            path,
            urlencoding::encode(&self.instance)
        )
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

/// Strip the admin UI `/manager` suffix and trailing slashes from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    const MANAGER_SUFFIX: &str = "/manager";

    let trimmed = url.trim().trim_end_matches('/');
    let split = trimmed.len().saturating_sub(MANAGER_SUFFIX.len());
    let without_manager = match trimmed.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(MANAGER_SUFFIX) => &trimmed[..split],
        _ => trimmed,
    };
    without_manager.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://api.example.com/"), "https://api.example.com");
        assert_eq!(
            normalize_base_url("https://api.example.com/manager"),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/Manager/"),
            "https://api.example.com"
        );
        assert_eq!(normalize_base_url("https://api.example.com"), "https://api.example.com");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = GatewayConfig::new("https://api.example.com/manager/", "t", "loja azul");
        assert_eq!(
            config.send_text_url(),
            "https://api.example.com/message/sendText/loja%20azul"
        );
        assert_eq!(
            config.presence_url(),
            "https://api.example.com/chat/sendPresence/loja%20azul"
        );
        assert_eq!(
            config.send_media_url(),
            "https://api.example.com/message/sendMedia/loja%20azul"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GatewayConfig::new("https://api.example.com", "secret-token", "x");
        assert!(!format!("{:?}", config).contains("secret-token"));
    }
}
