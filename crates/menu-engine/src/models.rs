//! Chatbot configuration types consumed by the resolver.

use serde::{Deserialize, Serialize};

/// Per-account chatbot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Whether the chatbot answers at all.
    pub is_enabled: bool,
    /// Reply used when nothing matches.
    pub fallback_message: String,
    /// Greeting text configured by the owner.
    pub welcome_message: String,
    /// Lower bound of the simulated response delay, in seconds.
    pub response_delay_min: u32,
    /// Upper bound of the simulated response delay, in seconds.
    pub response_delay_max: u32,
    /// Whether to show a "composing" presence before replying.
    pub typing_enabled: bool,
    /// Whether group conversations are skipped.
    pub ignore_groups: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            is_enabled: true,
            fallback_message: "Desculpe, não entendi. Digite *menu* para ver as opções.".to_string(),
            welcome_message: String::new(),
            response_delay_min: 0,
            response_delay_max: 0,
            typing_enabled: false,
            ignore_groups: true,
        }
    }
}

/// A menu screen, addressed by its key within an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Row identifier, referenced by [`MenuOption::menu_id`].
    pub id: String,
    pub menu_key: String,
    pub title: String,
    /// Body text; may contain `{variable}` placeholders.
    pub message_text: String,
    pub image_url: Option<String>,
    /// Informational only, navigation never follows it.
    pub parent_menu_key: Option<String>,
}

impl Menu {
    /// Create a text-only menu without a parent.
    pub fn new(
        id: impl Into<String>,
        menu_key: impl Into<String>,
        message_text: impl Into<String>,
    ) -> Self {
        let menu_key = menu_key.into();
        Self {
            id: id.into(),
            title: menu_key.clone(),
            menu_key,
            message_text: message_text.into(),
            image_url: None,
            parent_menu_key: None,
        }
    }

    /// Attach an image to the menu.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// What happens when a menu option is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionAction {
    /// Navigate to another menu.
    Menu { target: String },
    /// Reply with a canned text and stay put.
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    /// Hand the contact to a human attendant.
    Human {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    /// Say goodbye and go back to the main menu.
    End {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    /// Stored action that cannot be executed (unknown type or missing target).
    Unsupported,
}

impl OptionAction {
    /// Build an action from its stored columns.
    ///
    /// Unknown action types, and `menu` actions without a target, become
    /// [`OptionAction::Unsupported`].
    pub fn from_parts(
        action_type: &str,
        target_menu_key: Option<String>,
        response: Option<String>,
    ) -> Self {
        let response = response.filter(|r| !r.trim().is_empty());
        match action_type.trim().to_lowercase().as_str() {
            "menu" => match target_menu_key.filter(|t| !t.trim().is_empty()) {
                Some(target) => Self::Menu { target },
                None => Self::Unsupported,
            },
            "message" => Self::Message { response },
            "human" => Self::Human { response },
            "end" => Self::End { response },
            _ => Self::Unsupported,
        }
    }
}

/// A numbered choice inside a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Identifier of the owning [`Menu`].
    pub menu_id: String,
    /// 1-based number, unique within its menu.
    pub option_number: u32,
    pub option_text: String,
    /// Alternative words that also select this option.
    pub keywords: Vec<String>,
    pub action: OptionAction,
}

impl MenuOption {
    pub fn new(
        menu_id: impl Into<String>,
        option_number: u32,
        option_text: impl Into<String>,
        action: OptionAction,
    ) -> Self {
        Self {
            menu_id: menu_id.into(),
            option_number,
            option_text: option_text.into(),
            keywords: Vec::new(),
            action,
        }
    }

    /// Set the keyword alternatives.
    pub fn with_keywords<I, K>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// What a global trigger does when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerAction {
    /// Jump to a menu.
    GotoMenu { target: String },
    /// Reply with a canned text.
    Message { response: String },
    /// Hand off to a human attendant.
    Human,
    /// Stored action that cannot be executed.
    Unsupported,
}

impl TriggerAction {
    /// Build an action from its stored columns.
    ///
    /// `goto_menu` without a target and `message` without a response are
    /// [`TriggerAction::Unsupported`].
    pub fn from_parts(
        action_type: &str,
        target_menu_key: Option<String>,
        response_text: Option<String>,
    ) -> Self {
        match action_type.trim().to_lowercase().as_str() {
            "goto_menu" => match target_menu_key.filter(|t| !t.trim().is_empty()) {
                Some(target) => Self::GotoMenu { target },
                None => Self::Unsupported,
            },
            "message" => match response_text.filter(|r| !r.trim().is_empty()) {
                Some(response) => Self::Message { response },
                None => Self::Unsupported,
            },
            "human" => Self::Human,
            _ => Self::Unsupported,
        }
    }
}

/// An account-wide keyword trigger, checked before any menu option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTrigger {
    pub trigger_name: String,
    pub keywords: Vec<String>,
    pub action: TriggerAction,
    /// Higher values are evaluated first.
    pub priority: i32,
}

impl GlobalTrigger {
    pub fn new<I, K>(
        trigger_name: impl Into<String>,
        keywords: I,
        action: TriggerAction,
        priority: i32,
    ) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            trigger_name: trigger_name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            action,
            priority,
        }
    }
}

/// A `{key}` → value substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The active menus, options and triggers of one account.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    menus: Vec<Menu>,
    options: Vec<MenuOption>,
    /// Sorted by descending priority, ties in configured order.
    triggers: Vec<GlobalTrigger>,
}

impl MenuCatalog {
    pub fn new(menus: Vec<Menu>, options: Vec<MenuOption>, mut triggers: Vec<GlobalTrigger>) -> Self {
        // sort_by is stable, so equal priorities keep their configured order
        triggers.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self {
            menus,
            options,
            triggers,
        }
    }

    /// Look up a menu by key.
    pub fn menu(&self, menu_key: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.menu_key == menu_key)
    }

    /// Options of a menu, in configured order.
    pub fn options_for<'a>(&'a self, menu: &'a Menu) -> impl Iterator<Item = &'a MenuOption> + 'a {
        self.options.iter().filter(move |o| o.menu_id == menu.id)
    }

    /// Triggers in evaluation order.
    pub fn triggers(&self) -> &[GlobalTrigger] {
        &self.triggers
    }

    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_action_from_parts() {
        assert_eq!(
            OptionAction::from_parts("menu", Some("plans".into()), None),
            OptionAction::Menu {
                target: "plans".into()
            }
        );
        assert_eq!(OptionAction::from_parts("menu", None, None), OptionAction::Unsupported);
        assert_eq!(
            OptionAction::from_parts("END", None, Some("  ".into())),
            OptionAction::End { response: None }
        );
        assert_eq!(
            OptionAction::from_parts("transfer", None, None),
            OptionAction::Unsupported
        );
    }

    #[test]
    fn test_trigger_action_from_parts() {
        assert_eq!(
            TriggerAction::from_parts("goto_menu", Some("main".into()), None),
            TriggerAction::GotoMenu {
                target: "main".into()
            }
        );
        assert_eq!(
            TriggerAction::from_parts("message", None, None),
            TriggerAction::Unsupported
        );
        assert_eq!(TriggerAction::from_parts("human", None, None), TriggerAction::Human);
    }

    #[test]
    fn test_catalog_sorts_triggers_stably() {
        let catalog = MenuCatalog::new(
            vec![],
            vec![],
            vec![
                GlobalTrigger::new("low", ["a"], TriggerAction::Human, 1),
                GlobalTrigger::new("first", ["a"], TriggerAction::Human, 10),
                GlobalTrigger::new("second", ["a"], TriggerAction::Human, 10),
            ],
        );

        let names: Vec<_> = catalog
            .triggers()
            .iter()
            .map(|t| t.trigger_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "low"]);
    }

    #[test]
    fn test_parse_option_action_json() {
        let json = r#"{"type": "menu", "target": "plans"}"#;
        let action: OptionAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            OptionAction::Menu {
                target: "plans".into()
            }
        );
    }
}
