//! Chatbot configuration: settings, menus, options, triggers and variables.
//!
//! Reads return `menu-engine` types ready for the resolver. The write
//! helpers exist for provisioning accounts and for tests.

use menu_engine::{ChatConfig, GlobalTrigger, Menu, MenuOption, Variable};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{
    option_action_columns, trigger_action_columns, ChatbotConfigRow, ConfigCounts, MenuRow,
    OptionRow, TriggerRow, VariableRow,
};

/// Get the chatbot settings of an account.
pub async fn get_config(pool: &SqlitePool, user_id: &str) -> Result<Option<ChatConfig>> {
    let row = sqlx::query_as::<_, ChatbotConfigRow>(
        r#"
        SELECT user_id, is_enabled, fallback_message, welcome_message,
               response_delay_min, response_delay_max, typing_enabled, ignore_groups
        FROM chatbot_configs
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ChatConfig::from))
}

/// Create or replace the chatbot settings of an account.
pub async fn upsert_config(pool: &SqlitePool, user_id: &str, config: &ChatConfig) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chatbot_configs (
            user_id, is_enabled, fallback_message, welcome_message,
            response_delay_min, response_delay_max, typing_enabled, ignore_groups
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            is_enabled = excluded.is_enabled,
            fallback_message = excluded.fallback_message,
            welcome_message = excluded.welcome_message,
            response_delay_min = excluded.response_delay_min,
            response_delay_max = excluded.response_delay_max,
            typing_enabled = excluded.typing_enabled,
            ignore_groups = excluded.ignore_groups,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(config.is_enabled)
    .bind(&config.fallback_message)
    .bind(&config.welcome_message)
    .bind(config.response_delay_min as i64)
    .bind(config.response_delay_max as i64)
    .bind(config.typing_enabled)
    .bind(config.ignore_groups)
    .execute(pool)
    .await?;

    Ok(())
}

/// List the active menus of an account.
pub async fn list_active_menus(pool: &SqlitePool, user_id: &str) -> Result<Vec<Menu>> {
    let rows = sqlx::query_as::<_, MenuRow>(
        r#"
        SELECT id, menu_key, title, message_text, image_url, parent_menu_key
        FROM chatbot_menus
        WHERE user_id = ? AND is_active = 1
        ORDER BY menu_key
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Menu::from).collect())
}

/// Create a menu. The menu key must be unique within the account.
pub async fn create_menu(pool: &SqlitePool, user_id: &str, menu: &Menu) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chatbot_menus (id, user_id, menu_key, title, message_text, image_url, parent_menu_key)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&menu.id)
    .bind(user_id)
    .bind(&menu.menu_key)
    .bind(&menu.title)
    .bind(&menu.message_text)
    .bind(&menu.image_url)
    .bind(&menu.parent_menu_key)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "Menu", &menu.menu_key))?;

    Ok(())
}

/// List the active options of an account, in configured order per menu.
pub async fn list_active_options(pool: &SqlitePool, user_id: &str) -> Result<Vec<MenuOption>> {
    let rows = sqlx::query_as::<_, OptionRow>(
        r#"
        SELECT id, menu_id, option_number, option_text, keywords,
               action_type, target_menu_key, response_message
        FROM chatbot_options
        WHERE user_id = ? AND is_active = 1
        ORDER BY menu_id, option_number
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MenuOption::from).collect())
}

/// Create an option. Option numbers are unique within a menu.
pub async fn create_option(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    option: &MenuOption,
) -> Result<()> {
    let keywords = serde_json::to_string(&option.keywords)?;
    let (action_type, target, response) = option_action_columns(&option.action);

    sqlx::query(
        r#"
        INSERT INTO chatbot_options (
            id, user_id, menu_id, option_number, option_text, keywords,
            action_type, target_menu_key, response_message
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&option.menu_id)
    .bind(option.option_number as i64)
    .bind(&option.option_text)
    .bind(keywords)
    .bind(action_type)
    .bind(target)
    .bind(response)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "MenuOption", id))?;

    Ok(())
}

/// List the active triggers of an account, highest priority first.
pub async fn list_active_triggers(pool: &SqlitePool, user_id: &str) -> Result<Vec<GlobalTrigger>> {
    let rows = sqlx::query_as::<_, TriggerRow>(
        r#"
        SELECT id, trigger_name, keywords, action_type, target_menu_key, response_text, priority
        FROM chatbot_triggers
        WHERE user_id = ? AND is_active = 1
        ORDER BY priority DESC, created_at, rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(GlobalTrigger::from).collect())
}

/// Create a global trigger.
pub async fn create_trigger(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    trigger: &GlobalTrigger,
) -> Result<()> {
    let keywords = serde_json::to_string(&trigger.keywords)?;
    let (action_type, target, response) = trigger_action_columns(&trigger.action);

    sqlx::query(
        r#"
        INSERT INTO chatbot_triggers (
            id, user_id, trigger_name, keywords, action_type,
            target_menu_key, response_text, priority
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&trigger.trigger_name)
    .bind(keywords)
    .bind(action_type)
    .bind(target)
    .bind(response)
    .bind(trigger.priority as i64)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "GlobalTrigger", id))?;

    Ok(())
}

/// List the substitution variables of an account.
pub async fn list_variables(pool: &SqlitePool, user_id: &str) -> Result<Vec<Variable>> {
    let rows = sqlx::query_as::<_, VariableRow>(
        r#"
        SELECT variable_key, variable_value
        FROM chatbot_variables
        WHERE user_id = ?
        ORDER BY variable_key
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Variable::from).collect())
}

/// Create or update a variable.
pub async fn upsert_variable(pool: &SqlitePool, user_id: &str, variable: &Variable) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chatbot_variables (user_id, variable_key, variable_value)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id, variable_key) DO UPDATE SET
            variable_value = excluded.variable_value
        "#,
    )
    .bind(user_id)
    .bind(&variable.key)
    .bind(&variable.value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count configuration rows across all accounts.
pub async fn count_configuration(pool: &SqlitePool) -> Result<ConfigCounts> {
    let (configs, menus, triggers) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM chatbot_configs),
            (SELECT COUNT(*) FROM chatbot_menus),
            (SELECT COUNT(*) FROM chatbot_triggers)
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(ConfigCounts {
        configs,
        menus,
        triggers,
    })
}
