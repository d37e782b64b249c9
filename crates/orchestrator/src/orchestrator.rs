//! Webhook processing pipeline.

use std::time::Duration;

use chatbot_database::{Contact, ContactUpdate, NewContact, NewInteractionLog};
use menu_engine::{normalize, resolve, ChatConfig, MenuCatalog, Resolution};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info, warn};
use whatsapp_gateway::{preview, GatewayConfig, InboundMessage, WebhookEvent};

use crate::error::OrchestratorError;
use crate::outcome::{
    WebhookResponse, REASON_API_NOT_CONFIGURED, REASON_AWAITING_HUMAN, REASON_DISABLED,
    REASON_GROUP, REASON_INSTANCE_NOT_FOUND, REASON_OWN_MESSAGE,
};
use crate::sender::ReplyGateway;
use crate::store::ChatbotStore;

/// Answers inbound webhooks for every account sharing the gateway.
///
/// Requests are independent. Two messages from the same contact processed
/// concurrently both start from the stored state, and the last write wins.
pub struct WebhookOrchestrator<S: ChatbotStore, G: ReplyGateway> {
    store: S,
    gateway: G,
}

impl<S: ChatbotStore, G: ReplyGateway> WebhookOrchestrator<S, G> {
    pub fn new(store: S, gateway: G) -> Self {
        Self { store, gateway }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the reply gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Process one webhook payload.
    ///
    /// Ignored payloads and configuration problems are reported in the
    /// response; only store failures are errors.
    pub async fn handle(&self, payload: &Value) -> Result<WebhookResponse, OrchestratorError> {
        // 1. Parse the envelope
        let message = match WebhookEvent::parse(payload).into_message() {
            Ok(message) => message,
            Err(rejection) => {
                debug!("Ignoring payload: {}", rejection.reason());
                return Ok(WebhookResponse::ignored(rejection.reason()));
            }
        };

        if message.from_me {
            return Ok(WebhookResponse::ignored(REASON_OWN_MESSAGE));
        }

        info!(
            instance = %message.instance,
            phone = %message.phone,
            "Message received: {}",
            preview(&message.text)
        );

        // 2. Resolve the account
        let Some(account) = self.resolve_account(&message.instance).await? else {
            warn!(instance = %message.instance, "No account for instance");
            return Ok(WebhookResponse::error(REASON_INSTANCE_NOT_FOUND));
        };

        // 3. Load everything at once
        let (config, menus, options, triggers, variables, contact, credentials) = tokio::try_join!(
            self.store.chat_config(&account),
            self.store.active_menus(&account),
            self.store.active_options(&account),
            self.store.active_triggers(&account),
            self.store.variables(&account),
            self.store.contact(&account, &message.phone),
            self.store.gateway_credentials(&account),
        )?;

        // 4. Skip what this account does not answer
        let Some(config) = config.filter(|c| c.is_enabled) else {
            return Ok(WebhookResponse::ignored(REASON_DISABLED));
        };
        if config.ignore_groups && message.is_group {
            return Ok(WebhookResponse::ignored(REASON_GROUP));
        }
        if contact.as_ref().is_some_and(|c| c.awaiting_human) {
            info!(account = %account, phone = %message.phone, "Contact awaiting human, ignoring");
            return Ok(WebhookResponse::ignored(REASON_AWAITING_HUMAN));
        }
        let Some(credentials) = credentials else {
            warn!(account = %account, "Gateway credentials missing");
            return Ok(WebhookResponse::error(REASON_API_NOT_CONFIGURED));
        };

        // 5. First contact
        let prior_interactions = contact.as_ref().map_or(0, |c| c.interaction_count);
        let contact = match contact {
            Some(contact) => contact,
            None => {
                let new = NewContact {
                    user_id: account.clone(),
                    phone: message.phone.clone(),
                    name: Some(message.push_name.clone()).filter(|n| !n.is_empty()),
                };
                info!(account = %account, phone = %message.phone, "New contact");
                self.store.create_contact(&new).await?
            }
        };

        // 6. Decide the reply
        let catalog = MenuCatalog::new(menus, options, triggers);
        let input = normalize(&message.text);
        let resolution = resolve(
            &input,
            &contact.current_menu_key,
            &catalog,
            &config,
            &variables,
        );
        info!(
            account = %account,
            from = %contact.current_menu_key,
            to = %resolution.next_menu_key,
            trigger = ?resolution.matched_trigger,
            fallback = resolution.is_fallback,
            "Resolved"
        );

        // 7. Deliver
        let endpoint = GatewayConfig::new(&credentials.api_url, credentials.api_token, &message.instance);
        let sent = self.deliver(&endpoint, &message, &config, &resolution).await;

        // 8. Persist
        self.persist(&account, &message, &contact, prior_interactions, &resolution)
            .await?;

        Ok(WebhookResponse::processed(sent, &resolution))
    }

    async fn resolve_account(&self, instance: &str) -> Result<Option<String>, OrchestratorError> {
        if let Some(account) = self.store.seller_account(instance).await? {
            return Ok(Some(account));
        }
        self.store.global_account(instance).await
    }

    async fn deliver(
        &self,
        endpoint: &GatewayConfig,
        message: &InboundMessage,
        config: &ChatConfig,
        resolution: &Resolution,
    ) -> bool {
        let delay = response_delay(config);
        if config.typing_enabled {
            self.gateway
                .simulate_typing(endpoint, &message.phone, delay)
                .await;
        } else {
            tokio::time::sleep(delay).await;
        }

        match &resolution.image_url {
            Some(image_url) => {
                self.gateway
                    .send_image(endpoint, &message.phone, &resolution.reply, image_url)
                    .await
            }
            None => {
                self.gateway
                    .send_text(endpoint, &message.phone, &resolution.reply)
                    .await
            }
        }
    }

    /// Save the contact's new state and log the exchange.
    ///
    /// A failed log insert is dropped; a failed contact write is retried once
    /// and then returned.
    async fn persist(
        &self,
        account: &str,
        message: &InboundMessage,
        contact: &Contact,
        prior_interactions: i64,
        resolution: &Resolution,
    ) -> Result<(), OrchestratorError> {
        let update = ContactUpdate {
            current_menu_key: resolution.next_menu_key.clone(),
            awaiting_human: resolution.handoff,
            interaction_count: prior_interactions + 1,
            name: Some(message.push_name.clone()).filter(|n| !n.is_empty()),
        };
        let log = NewInteractionLog::new(
            account,
            &contact.phone,
            &message.text,
            &resolution.reply,
            &resolution.next_menu_key,
        )
        .with_trigger(resolution.matched_trigger.clone())
        .with_fallback(resolution.is_fallback);

        let (contact_result, log_result) = tokio::join!(
            self.update_contact_with_retry(account, &contact.phone, &update),
            self.store.insert_log(&log),
        );

        if let Err(e) = log_result {
            warn!(account = %account, phone = %contact.phone, error = %e, "Failed to write interaction log");
        }

        contact_result
    }

    async fn update_contact_with_retry(
        &self,
        account: &str,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<(), OrchestratorError> {
        match self.store.update_contact(account, phone, update).await {
            Ok(()) => Ok(()),
            Err(first) => {
                warn!(account = %account, phone = %phone, error = %first, "Contact update failed, retrying");
                self.store
                    .update_contact(account, phone, update)
                    .await
                    .map_err(|e| OrchestratorError::ContactPersistence {
                        phone: phone.to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

/// Random whole-second delay within the configured bounds.
fn response_delay(config: &ChatConfig) -> Duration {
    let min = config.response_delay_min;
    let max = config.response_delay_max.max(min);
    let seconds = if min == max {
        min
    } else {
        rand::thread_rng().gen_range(min..=max)
    };
    Duration::from_secs(u64::from(seconds))
}
