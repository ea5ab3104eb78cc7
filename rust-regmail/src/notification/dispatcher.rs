//! Notification dispatcher.
//!
//! For each recipient policy the dispatcher either records why the recipient
//! is skipped or walks the provider fallback chain in order until one
//! provider reports delivery. Provider calls are strictly sequential.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::message::NotificationMessage;
use super::providers::{
    EmailProvider, MailgunConfig, MailgunProvider, SendGridConfig, SendGridProvider,
};
use super::recipients::{RecipientClass, RecipientPolicy};
use crate::config::RecipientsConfig;
use crate::database::models::Registration;

/// Result of notifying one recipient class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotificationOutcome {
    pub recipient_class: RecipientClass,
    pub delivered: bool,
    pub detail: String,
}

impl NotificationOutcome {
    fn delivered(recipient_class: RecipientClass, detail: String) -> Self {
        Self {
            recipient_class,
            delivered: true,
            detail,
        }
    }

    fn failed(recipient_class: RecipientClass, detail: String) -> Self {
        Self {
            recipient_class,
            delivered: false,
            detail,
        }
    }
}

/// Outcomes keyed by recipient class, iterated in class order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOutcomes(BTreeMap<RecipientClass, NotificationOutcome>);

impl NotificationOutcomes {
    pub fn get(&self, class: RecipientClass) -> Option<&NotificationOutcome> {
        self.0.get(&class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationOutcome> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, outcome: NotificationOutcome) {
        self.0.insert(outcome.recipient_class, outcome);
    }

    pub fn into_vec(self) -> Vec<NotificationOutcome> {
        self.0.into_values().collect()
    }
}

/// Dispatches registration notifications through an ordered provider chain.
pub struct NotificationDispatcher {
    providers: Vec<Arc<dyn EmailProvider>>,
    policies: Vec<RecipientPolicy>,
}

impl NotificationDispatcher {
    /// Create a dispatcher from an explicit provider chain and recipient policies.
    pub fn new(providers: Vec<Arc<dyn EmailProvider>>, policies: Vec<RecipientPolicy>) -> Self {
        Self {
            providers,
            policies,
        }
    }

    /// Mailgun first, SendGrid as fallback, with the default recipient policies.
    pub fn from_config(
        mailgun: MailgunConfig,
        sendgrid: SendGridConfig,
        recipients: &RecipientsConfig,
    ) -> Self {
        let providers: Vec<Arc<dyn EmailProvider>> = vec![
            Arc::new(MailgunProvider::new(mailgun)),
            Arc::new(SendGridProvider::new(sendgrid)),
        ];
        Self::new(providers, RecipientPolicy::defaults(recipients))
    }

    /// Names of the providers in fallback order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Names of the providers that have the credentials they need.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.name())
            .collect()
    }

    /// Names of the providers that will always report "not configured".
    pub fn unconfigured_providers(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .filter(|p| !p.is_configured())
            .map(|p| p.name())
            .collect()
    }

    /// Notify every recipient class about `registration`.
    ///
    /// Never fails: every provider-side problem ends up in an outcome detail.
    pub async fn dispatch(&self, registration: &Registration) -> NotificationOutcomes {
        let message = NotificationMessage::for_registration(registration);
        let mut outcomes = NotificationOutcomes::default();

        for policy in &self.policies {
            let outcome = match policy.resolve(registration) {
                Ok(address) => self.deliver(policy.class, address, &message).await,
                Err(skip) => {
                    let detail = policy.skip_detail(skip);
                    debug!(
                        registration_id = registration.id,
                        recipient = %policy.class,
                        %detail,
                        "Recipient skipped"
                    );
                    NotificationOutcome::failed(policy.class, detail)
                }
            };
            outcomes.insert(outcome);
        }

        outcomes
    }

    /// Walk the fallback chain for one recipient.
    async fn deliver(
        &self,
        class: RecipientClass,
        address: &str,
        message: &NotificationMessage,
    ) -> NotificationOutcome {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let report = provider
                .send(address, &message.subject, &message.body)
                .await;
            if report.delivered {
                info!(
                    recipient = %class,
                    provider = provider.name(),
                    "Notification delivered"
                );
                return NotificationOutcome::delivered(
                    class,
                    format!("delivered via {}", provider.name()),
                );
            }
            debug!(
                recipient = %class,
                provider = provider.name(),
                detail = %report.detail,
                "Provider failed, trying next"
            );
            failures.push(report.detail);
        }

        let detail = match failures.len() {
            0 => "no providers available".to_string(),
            2 => format!("both providers failed: {}", failures.join(" / ")),
            _ => format!("all providers failed: {}", failures.join(" / ")),
        };
        warn!(recipient = %class, %detail, "Notification not delivered");
        NotificationOutcome::failed(class, detail)
    }
}
