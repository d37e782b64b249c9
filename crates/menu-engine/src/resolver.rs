//! Dialogue resolution: decide the reply and the next menu for one message.

use tracing::debug;

use crate::matcher::matches_keywords;
use crate::models::{ChatConfig, Menu, MenuCatalog, MenuOption, OptionAction, TriggerAction, Variable};
use crate::normalize::NormalizedInput;
use crate::variables::substitute;

/// Menu key every contact starts in.
pub const MAIN_MENU_KEY: &str = "main";

/// Reply sent when a contact is handed to a human attendant.
pub const DEFAULT_HANDOFF_REPLY: &str =
    "Aguarde, você será atendido por um de nossos atendentes. 👤";

/// Reply for an `end` option without its own response.
pub const DEFAULT_FAREWELL: &str = "Obrigado pelo contato! Até a próxima. 👋";

/// Reply for a `message` option without its own response.
pub const DEFAULT_MESSAGE_REPLY: &str = "Mensagem recebida!";

/// Outcome of resolving one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Reply text, variables already substituted.
    pub reply: String,
    /// Image to send with the reply as caption.
    pub image_url: Option<String>,
    /// Menu key the contact moves to.
    pub next_menu_key: String,
    /// Name of the global trigger that fired, if any.
    pub matched_trigger: Option<String>,
    /// Nothing matched; the fallback message was used.
    pub is_fallback: bool,
    /// The contact must be handed to a human.
    pub handoff: bool,
}

impl Resolution {
    fn reply(reply: String, next_menu_key: impl Into<String>) -> Self {
        Self {
            reply,
            image_url: None,
            next_menu_key: next_menu_key.into(),
            matched_trigger: None,
            is_fallback: false,
            handoff: false,
        }
    }

    fn show_menu(menu: &Menu, variables: &[Variable]) -> Self {
        Self {
            image_url: menu.image_url.clone().filter(|u| !u.is_empty()),
            ..Self::reply(substitute(&menu.message_text, variables), &menu.menu_key)
        }
    }

    fn fallback(config: &ChatConfig, variables: &[Variable], menu_key: impl Into<String>) -> Self {
        Self {
            is_fallback: true,
            ..Self::reply(substitute(&config.fallback_message, variables), menu_key)
        }
    }

    fn handoff(reply: String, menu_key: impl Into<String>) -> Self {
        Self {
            handoff: true,
            ..Self::reply(reply, menu_key)
        }
    }

    fn with_trigger(mut self, name: &str) -> Self {
        self.matched_trigger = Some(name.to_string());
        self
    }
}

/// Resolve the reply for a message given the contact's current menu.
///
/// Order: global triggers (by priority), exact option number, option
/// keywords, fallback. Configuration problems such as missing target menus
/// degrade to the fallback reply.
pub fn resolve(
    input: &NormalizedInput,
    current_menu_key: &str,
    catalog: &MenuCatalog,
    config: &ChatConfig,
    variables: &[Variable],
) -> Resolution {
    if let Some(resolution) = resolve_trigger(input, current_menu_key, catalog, config, variables) {
        return resolution;
    }

    let Some(menu) = catalog
        .menu(current_menu_key)
        .or_else(|| catalog.menu(MAIN_MENU_KEY))
    else {
        debug!(menu = current_menu_key, "No current or main menu, using fallback");
        return Resolution::fallback(config, variables, MAIN_MENU_KEY);
    };
    let state = menu.menu_key.as_str();

    if let Some(number) = input.number {
        if let Some(option) = catalog.options_for(menu).find(|o| o.option_number == number) {
            return resolve_option(option, state, catalog, config, variables);
        }
    }

    if let Some(option) = catalog
        .options_for(menu)
        .find(|o| matches_keywords(&input.text, &o.keywords))
    {
        return resolve_option(option, state, catalog, config, variables);
    }

    debug!(menu = state, "No match found, sending fallback");
    Resolution::fallback(config, variables, state)
}

fn resolve_trigger(
    input: &NormalizedInput,
    current_menu_key: &str,
    catalog: &MenuCatalog,
    config: &ChatConfig,
    variables: &[Variable],
) -> Option<Resolution> {
    let trigger = catalog
        .triggers()
        .iter()
        .find(|t| matches_keywords(&input.text, &t.keywords))?;

    debug!(trigger = %trigger.trigger_name, "Trigger matched");

    let resolution = match &trigger.action {
        TriggerAction::GotoMenu { target } => match catalog.menu(target) {
            Some(menu) => Resolution::show_menu(menu, variables),
            None => Resolution::fallback(config, variables, current_menu_key),
        },
        TriggerAction::Message { response } => {
            Resolution::reply(substitute(response, variables), current_menu_key)
        }
        TriggerAction::Human => {
            Resolution::handoff(DEFAULT_HANDOFF_REPLY.to_string(), current_menu_key)
        }
        TriggerAction::Unsupported => Resolution::fallback(config, variables, current_menu_key),
    };

    Some(resolution.with_trigger(&trigger.trigger_name))
}

fn resolve_option(
    option: &MenuOption,
    current_menu_key: &str,
    catalog: &MenuCatalog,
    config: &ChatConfig,
    variables: &[Variable],
) -> Resolution {
    debug!(
        number = option.option_number,
        text = %option.option_text,
        "Option matched"
    );

    let text = |response: &Option<String>, default: &str| {
        substitute(response.as_deref().unwrap_or(default), variables)
    };

    match &option.action {
        OptionAction::Menu { target } => match catalog.menu(target) {
            Some(menu) => Resolution::show_menu(menu, variables),
            None => Resolution::fallback(config, variables, current_menu_key),
        },
        OptionAction::Message { response } => {
            Resolution::reply(text(response, DEFAULT_MESSAGE_REPLY), current_menu_key)
        }
        OptionAction::Human { response } => {
            Resolution::handoff(text(response, DEFAULT_HANDOFF_REPLY), current_menu_key)
        }
        OptionAction::End { response } => {
            Resolution::reply(text(response, DEFAULT_FAREWELL), MAIN_MENU_KEY)
        }
        OptionAction::Unsupported => Resolution::fallback(config, variables, current_menu_key),
    }
}
