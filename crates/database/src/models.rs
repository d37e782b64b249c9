//! Database models.
//!
//! Row types mirror the tables one to one. Configuration rows convert into
//! the `menu-engine` types the resolver consumes; action columns are decoded
//! by the engine's `from_parts` constructors, so unknown or incomplete rows
//! arrive as `Unsupported` instead of failing the whole load.

use menu_engine::{
    ChatConfig, GlobalTrigger, Menu, MenuOption, OptionAction, TriggerAction, Variable,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Longest response text stored in an interaction log.
pub const MAX_LOGGED_RESPONSE_CHARS: usize = 1000;

/// A gateway instance registered by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SellerInstance {
    pub id: i64,
    /// Account that owns the instance.
    pub seller_id: String,
    pub instance_name: String,
    pub created_at: String,
}

/// A gateway registration with its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GatewayRegistration {
    pub id: i64,
    /// Account that answers messages arriving on `instance_name`.
    pub admin_user_id: String,
    pub instance_name: String,
    /// Gateway base URL as configured (may still end in `/manager`).
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub is_active: bool,
}

/// Data for a new gateway registration.
#[derive(Debug, Clone)]
pub struct NewGatewayRegistration {
    pub admin_user_id: String,
    pub instance_name: String,
    pub api_url: String,
    pub api_token: String,
}

/// Base URL and token for talking to the gateway.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct GatewayCredentials {
    pub api_url: String,
    pub api_token: String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Per-account chatbot settings as stored.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ChatbotConfigRow {
    pub user_id: String,
    pub is_enabled: bool,
    pub fallback_message: String,
    pub welcome_message: String,
    pub response_delay_min: i64,
    pub response_delay_max: i64,
    pub typing_enabled: bool,
    pub ignore_groups: bool,
}

impl From<ChatbotConfigRow> for ChatConfig {
    fn from(row: ChatbotConfigRow) -> Self {
        let seconds = |v: i64| u32::try_from(v).unwrap_or(0);
        let min = seconds(row.response_delay_min);
        Self {
            is_enabled: row.is_enabled,
            fallback_message: row.fallback_message,
            welcome_message: row.welcome_message,
            response_delay_min: min,
            response_delay_max: seconds(row.response_delay_max).max(min),
            typing_enabled: row.typing_enabled,
            ignore_groups: row.ignore_groups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MenuRow {
    pub id: String,
    pub menu_key: String,
    pub title: String,
    pub message_text: String,
    pub image_url: Option<String>,
    pub parent_menu_key: Option<String>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            menu_key: row.menu_key,
            title: row.title,
            message_text: row.message_text,
            image_url: row.image_url.filter(|u| !u.trim().is_empty()),
            parent_menu_key: row.parent_menu_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OptionRow {
    pub id: String,
    pub menu_id: String,
    pub option_number: i64,
    pub option_text: String,
    /// JSON array of strings.
    pub keywords: String,
    pub action_type: String,
    pub target_menu_key: Option<String>,
    pub response_message: Option<String>,
}

impl From<OptionRow> for MenuOption {
    fn from(row: OptionRow) -> Self {
        let action =
            OptionAction::from_parts(&row.action_type, row.target_menu_key, row.response_message);
        Self {
            menu_id: row.menu_id,
            option_number: u32::try_from(row.option_number).unwrap_or(0),
            option_text: row.option_text,
            keywords: parse_keywords(&row.id, &row.keywords),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TriggerRow {
    pub id: String,
    pub trigger_name: String,
    /// JSON array of strings.
    pub keywords: String,
    pub action_type: String,
    pub target_menu_key: Option<String>,
    pub response_text: Option<String>,
    pub priority: i64,
}

impl From<TriggerRow> for GlobalTrigger {
    fn from(row: TriggerRow) -> Self {
        let action =
            TriggerAction::from_parts(&row.action_type, row.target_menu_key, row.response_text);
        let priority = row.priority.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Self {
            keywords: parse_keywords(&row.id, &row.keywords),
            trigger_name: row.trigger_name,
            action,
            priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VariableRow {
    pub variable_key: String,
    pub variable_value: String,
}

impl From<VariableRow> for Variable {
    fn from(row: VariableRow) -> Self {
        Variable::new(row.variable_key, row.variable_value)
    }
}

/// A person talking to an account's chatbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub user_id: String,
    /// Digits only, as extracted from the sender JID.
    pub phone: String,
    /// WhatsApp display name, if one was ever seen.
    pub name: Option<String>,
    pub current_menu_key: String,
    /// The bot stays silent while an attendant handles the contact.
    pub awaiting_human: bool,
    pub interaction_count: i64,
    pub last_message_at: Option<String>,
    pub last_response_at: Option<String>,
    pub created_at: String,
}

/// Data for a first-time contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub user_id: String,
    pub phone: String,
    pub name: Option<String>,
}

/// Conversation state written after a processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactUpdate {
    pub current_menu_key: String,
    pub awaiting_human: bool,
    pub interaction_count: i64,
    /// New display name; `None` keeps the stored one.
    pub name: Option<String>,
}

/// A logged exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InteractionLog {
    pub id: i64,
    pub user_id: String,
    pub contact_phone: String,
    pub incoming_message: String,
    pub response_sent: String,
    pub menu_key: String,
    pub trigger_matched: Option<String>,
    pub was_fallback: bool,
    pub created_at: String,
}

/// Data for a new interaction log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteractionLog {
    pub user_id: String,
    pub contact_phone: String,
    pub incoming_message: String,
    /// At most [`MAX_LOGGED_RESPONSE_CHARS`] characters.
    pub response_sent: String,
    pub menu_key: String,
    pub trigger_matched: Option<String>,
    pub was_fallback: bool,
}

impl NewInteractionLog {
    /// Build a log entry, truncating the response text.
    pub fn new(
        user_id: impl Into<String>,
        contact_phone: impl Into<String>,
        incoming_message: impl Into<String>,
        response_sent: &str,
        menu_key: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            contact_phone: contact_phone.into(),
            incoming_message: incoming_message.into(),
            response_sent: response_sent.chars().take(MAX_LOGGED_RESPONSE_CHARS).collect(),
            menu_key: menu_key.into(),
            trigger_matched: None,
            was_fallback: false,
        }
    }

    pub fn with_trigger(mut self, trigger: Option<String>) -> Self {
        self.trigger_matched = trigger;
        self
    }

    pub fn with_fallback(mut self, was_fallback: bool) -> Self {
        self.was_fallback = was_fallback;
        self
    }
}

/// Row counts reported by the diagnostic endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCounts {
    pub configs: i64,
    pub menus: i64,
    pub triggers: i64,
}

/// Decode a JSON keyword column. Malformed values yield no keywords.
pub(crate) fn parse_keywords(row_id: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keywords) => keywords,
        Err(e) => {
            tracing::warn!(row = %row_id, error = %e, "Ignoring malformed keywords column");
            Vec::new()
        }
    }
}

/// Storage columns `(action_type, target_menu_key, response)` of an option action.
pub(crate) fn option_action_columns(
    action: &OptionAction,
) -> (&'static str, Option<&str>, Option<&str>) {
    match action {
        OptionAction::Menu { target } => ("menu", Some(target.as_str()), None),
        OptionAction::Message { response } => ("message", None, response.as_deref()),
        OptionAction::Human { response } => ("human", None, response.as_deref()),
        OptionAction::End { response } => ("end", None, response.as_deref()),
        OptionAction::Unsupported => ("unsupported", None, None),
    }
}

/// Storage columns `(action_type, target_menu_key, response_text)` of a trigger action.
pub(crate) fn trigger_action_columns(
    action: &TriggerAction,
) -> (&'static str, Option<&str>, Option<&str>) {
    match action {
        TriggerAction::GotoMenu { target } => ("goto_menu", Some(target.as_str()), None),
        TriggerAction::Message { response } => ("message", None, Some(response.as_str())),
        TriggerAction::Human => ("human", None, None),
        TriggerAction::Unsupported => ("unsupported", None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("o1", r#"["planos", "preço"]"#), vec!["planos", "preço"]);
        assert!(parse_keywords("o1", "planos, preço").is_empty());
        assert!(parse_keywords("o1", "[]").is_empty());
    }

    #[test]
    fn test_option_row_with_unknown_action() {
        let row = OptionRow {
            id: "o1".into(),
            menu_id: "m1".into(),
            option_number: 2,
            option_text: "Falar com vendedor".into(),
            keywords: "[]".into(),
            action_type: "webhook".into(),
            target_menu_key: None,
            response_message: None,
        };
        let option = MenuOption::from(row);
        assert_eq!(option.action, OptionAction::Unsupported);
        assert_eq!(option.option_number, 2);
    }

    #[test]
    fn test_config_row_clamps_delays() {
        let row = ChatbotConfigRow {
            user_id: "u1".into(),
            is_enabled: true,
            fallback_message: "?".into(),
            welcome_message: String::new(),
            response_delay_min: 5,
            response_delay_max: 2,
            typing_enabled: true,
            ignore_groups: false,
        };
        let config = ChatConfig::from(row);
        assert_eq!(config.response_delay_min, 5);
        assert_eq!(config.response_delay_max, 5);
    }

    #[test]
    fn test_log_truncates_response() {
        let long = "é".repeat(1500);
        let log = NewInteractionLog::new("u1", "5511999999999", "oi", &long, "main");
        assert_eq!(log.response_sent.chars().count(), MAX_LOGGED_RESPONSE_CHARS);
    }

    #[test]
    fn test_credentials_debug_hides_token() {
        let creds = GatewayCredentials {
            api_url: "https://gw.example.com".into(),
            api_token: "secret".into(),
        };
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
