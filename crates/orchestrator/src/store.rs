//! Storage seam for the orchestrator.

use async_trait::async_trait;
use chatbot_database::{
    chatbot, contact, instance, interaction_log, Contact, ContactUpdate, Database,
    GatewayCredentials, NewContact, NewInteractionLog,
};
use menu_engine::{ChatConfig, GlobalTrigger, Menu, MenuOption, Variable};

use crate::error::OrchestratorError;

/// Everything the orchestrator reads and writes.
///
/// Configuration is read-only; only contacts and interaction logs are
/// written. Abstracted so tests can run against an in-memory store.
#[async_trait]
pub trait ChatbotStore: Send + Sync {
    /// Account owning a seller-registered instance (case-insensitive).
    async fn seller_account(&self, instance: &str) -> Result<Option<String>, OrchestratorError>;

    /// Account behind an active global registration of the instance.
    async fn global_account(&self, instance: &str) -> Result<Option<String>, OrchestratorError>;

    async fn chat_config(&self, account: &str) -> Result<Option<ChatConfig>, OrchestratorError>;

    async fn active_menus(&self, account: &str) -> Result<Vec<Menu>, OrchestratorError>;

    async fn active_options(&self, account: &str) -> Result<Vec<MenuOption>, OrchestratorError>;

    async fn active_triggers(&self, account: &str)
        -> Result<Vec<GlobalTrigger>, OrchestratorError>;

    async fn variables(&self, account: &str) -> Result<Vec<Variable>, OrchestratorError>;

    async fn contact(
        &self,
        account: &str,
        phone: &str,
    ) -> Result<Option<Contact>, OrchestratorError>;

    /// Credentials for replying on behalf of the account.
    async fn gateway_credentials(
        &self,
        account: &str,
    ) -> Result<Option<GatewayCredentials>, OrchestratorError>;

    async fn create_contact(&self, contact: &NewContact) -> Result<Contact, OrchestratorError>;

    async fn update_contact(
        &self,
        account: &str,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<(), OrchestratorError>;

    async fn insert_log(&self, log: &NewInteractionLog) -> Result<(), OrchestratorError>;
}

#[async_trait]
impl ChatbotStore for Database {
    async fn seller_account(&self, instance_name: &str) -> Result<Option<String>, OrchestratorError> {
        let row = instance::find_seller_instance(self.pool(), instance_name).await?;
        Ok(row.map(|r| r.seller_id))
    }

    async fn global_account(&self, instance_name: &str) -> Result<Option<String>, OrchestratorError> {
        let row = instance::find_active_gateway(self.pool(), instance_name).await?;
        Ok(row.map(|r| r.admin_user_id))
    }

    async fn chat_config(&self, account: &str) -> Result<Option<ChatConfig>, OrchestratorError> {
        Ok(chatbot::get_config(self.pool(), account).await?)
    }

    async fn active_menus(&self, account: &str) -> Result<Vec<Menu>, OrchestratorError> {
        Ok(chatbot::list_active_menus(self.pool(), account).await?)
    }

    async fn active_options(&self, account: &str) -> Result<Vec<MenuOption>, OrchestratorError> {
        Ok(chatbot::list_active_options(self.pool(), account).await?)
    }

    async fn active_triggers(
        &self,
        account: &str,
    ) -> Result<Vec<GlobalTrigger>, OrchestratorError> {
        Ok(chatbot::list_active_triggers(self.pool(), account).await?)
    }

    async fn variables(&self, account: &str) -> Result<Vec<Variable>, OrchestratorError> {
        Ok(chatbot::list_variables(self.pool(), account).await?)
    }

    async fn contact(
        &self,
        account: &str,
        phone: &str,
    ) -> Result<Option<Contact>, OrchestratorError> {
        Ok(contact::get_contact(self.pool(), account, phone).await?)
    }

    async fn gateway_credentials(
        &self,
        account: &str,
    ) -> Result<Option<GatewayCredentials>, OrchestratorError> {
        Ok(instance::gateway_credentials(self.pool(), account).await?)
    }

    async fn create_contact(&self, new: &NewContact) -> Result<Contact, OrchestratorError> {
        Ok(contact::create_contact(self.pool(), new).await?)
    }

    async fn update_contact(
        &self,
        account: &str,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<(), OrchestratorError> {
        Ok(contact::update_contact(self.pool(), account, phone, update).await?)
    }

    async fn insert_log(&self, log: &NewInteractionLog) -> Result<(), OrchestratorError> {
        interaction_log::insert_log(self.pool(), log).await?;
        Ok(())
    }
}
