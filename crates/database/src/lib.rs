//! SQLite persistence for the menu chatbot.
//!
//! This crate stores gateway registrations, per-account chatbot
//! configuration (settings, menus, options, triggers, variables), contact
//! conversation state and the interaction log, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{chatbot, contact, Database, NewContact};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:chatbot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let menus = chatbot::list_active_menus(db.pool(), "seller-1").await?;
//!     println!("{} menus", menus.len());
//!
//!     let new = NewContact {
//!         user_id: "seller-1".to_string(),
//!         phone: "5511999999999".to_string(),
//!         name: Some("Maria".to_string()),
//!     };
//!     contact::create_contact(db.pool(), &new).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod chatbot;
pub mod contact;
pub mod error;
pub mod instance;
pub mod interaction_log;
pub mod models;

pub use error::{DatabaseError, Result};
pub use models::{
    ConfigCounts, Contact, ContactUpdate, GatewayCredentials, GatewayRegistration, InteractionLog,
    NewContact, NewGatewayRegistration, NewInteractionLog, SellerInstance,
    MAX_LOGGED_RESPONSE_CHARS,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size. Each webhook fans out several reads at once.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/chatbot.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_engine::{ChatConfig, Menu, MenuCatalog, MenuOption, OptionAction};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_account_provisioning() {
        let db = test_db().await;

        // Register
        instance::register_seller_instance(db.pool(), "seller-1", "Loja").await.unwrap();
        instance::add_gateway(
            db.pool(),
            &NewGatewayRegistration {
                admin_user_id: "admin".into(),
                instance_name: "central".into(),
                api_url: "https://gw.example.com/manager".into(),
                api_token: "t".into(),
            },
        )
        .await
        .unwrap();

        // Configure
        chatbot::upsert_config(db.pool(), "seller-1", &ChatConfig::default())
            .await
            .unwrap();
        chatbot::create_menu(db.pool(), "seller-1", &Menu::new("m-main", "main", "1 Planos"))
            .await
            .unwrap();
        chatbot::create_menu(db.pool(), "seller-1", &Menu::new("m-plans", "plans", "Planos"))
            .await
            .unwrap();
        chatbot::create_option(
            db.pool(),
            "seller-1",
            "o1",
            &MenuOption::new(
                "m-main",
                1,
                "Planos",
                OptionAction::Menu {
                    target: "plans".into(),
                },
            ),
        )
        .await
        .unwrap();

        // Load
        let seller = instance::find_seller_instance(db.pool(), "loja").await.unwrap().unwrap();
        let menus = chatbot::list_active_menus(db.pool(), &seller.seller_id).await.unwrap();
        let options = chatbot::list_active_options(db.pool(), &seller.seller_id).await.unwrap();
        let triggers = chatbot::list_active_triggers(db.pool(), &seller.seller_id).await.unwrap();
        let catalog = MenuCatalog::new(menus, options, triggers);

        assert_eq!(catalog.menu_count(), 2);
        let main = catalog.menu("main").unwrap();
        assert_eq!(catalog.options_for(main).count(), 1);

        let creds = instance::gateway_credentials(db.pool(), &seller.seller_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.api_url, "https://gw.example.com/manager");
    }

    #[tokio::test]
    async fn test_options_removed_with_menu() {
        let db = test_db().await;
        chatbot::create_menu(db.pool(), "u1", &Menu::new("m1", "main", "a")).await.unwrap();
        chatbot::create_option(
            db.pool(),
            "u1",
            "o1",
            &MenuOption::new("m1", 1, "x", OptionAction::Message { response: None }),
        )
        .await
        .unwrap();

        sqlx::query("DELETE FROM chatbot_menus WHERE id = 'm1'")
            .execute(db.pool())
            .await
            .unwrap();

        let options = chatbot::list_active_options(db.pool(), "u1").await.unwrap();
        assert!(options.is_empty());
    }
}
