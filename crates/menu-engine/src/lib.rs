//! Menu state machine for the WhatsApp chatbot.
//!
//! This crate holds everything that decides *what* to answer, with no I/O:
//!
//! - [`normalize`] - Canonical form of the user's text plus an optional digit choice
//! - [`matches_keywords`] - Case-insensitive keyword containment
//! - [`substitute`] - `{variable}` placeholder replacement
//! - [`resolve`] - The dialogue resolver that picks the next menu and reply
//!
//! # Example
//!
//! ```rust
//! use menu_engine::{normalize, resolve, ChatConfig, Menu, MenuCatalog, MenuOption, OptionAction};
//!
//! let catalog = MenuCatalog::new(
//!     vec![
//!         Menu::new("m1", "main", "1 - Plans"),
//!         Menu::new("m2", "plans", "Our plans"),
//!     ],
//!     vec![MenuOption::new("m1", 1, "Plans", OptionAction::Menu { target: "plans".into() })],
//!     vec![],
//! );
//!
//! let input = normalize("1️⃣");
//! let resolution = resolve(&input, "main", &catalog, &ChatConfig::default(), &[]);
//! assert_eq!(resolution.next_menu_key, "plans");
//! ```

mod matcher;
mod models;
mod normalize;
mod resolver;
mod variables;

pub use matcher::matches_keywords;
pub use models::{
    ChatConfig, GlobalTrigger, Menu, MenuCatalog, MenuOption, OptionAction, TriggerAction,
    Variable,
};
pub use normalize::{normalize, NormalizedInput};
pub use resolver::{
    resolve, Resolution, DEFAULT_FAREWELL, DEFAULT_HANDOFF_REPLY, DEFAULT_MESSAGE_REPLY,
    MAIN_MENU_KEY,
};
pub use variables::substitute;
