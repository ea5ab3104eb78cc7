//! Mailgun messages API provider.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::{DeliveryReport, EmailProvider};
use crate::utils::http_client::build_provider_client;

const PROVIDER_NAME: &str = "Mailgun";

/// Mailgun US region endpoint.
pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";

/// Mailgun provider configuration.
#[derive(Clone)]
pub struct MailgunConfig {
    /// Private API key.
    pub api_key: Option<String>,
    /// Sending domain (e.g. `mg.example.org`).
    pub domain: Option<String>,
    /// API base URL, without the `/v3` suffix.
    pub api_base: String,
    /// Sender address.
    pub from_address: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for MailgunConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: None,
            api_base: DEFAULT_MAILGUN_API_BASE.to_string(),
            from_address: "no-reply@example.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .field("api_base", &self.api_base)
            .field("from_address", &self.from_address)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Mailgun email provider.
pub struct MailgunProvider {
    config: MailgunConfig,
    client: Client,
}

impl MailgunProvider {
    /// Create a new Mailgun provider.
    pub fn new(config: MailgunConfig) -> Self {
        let client = build_provider_client(PROVIDER_NAME, config.timeout);
        Self { config, client }
    }

    fn messages_url(&self, domain: &str) -> String {
        format!(
            "{}/v3/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            domain
        )
    }
}

#[async_trait]
impl EmailProvider for MailgunProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.config.domain.is_some()
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> DeliveryReport {
        let (Some(api_key), Some(domain)) = (&self.config.api_key, &self.config.domain) else {
            return DeliveryReport::not_configured(PROVIDER_NAME);
        };

        let url = self.messages_url(domain);
        let form = [
            ("from", self.config.from_address.as_str()),
            ("to", to),
            ("subject", subject),
            ("text", body),
        ];

        let response = match self
            .client
            .post(&url)
            .basic_auth("api", Some(api_key))
            .form(&form)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = PROVIDER_NAME, error = %e, "Email request failed");
                return DeliveryReport::transport(PROVIDER_NAME, &e);
            }
        };

        let status = response.status();
        if matches!(status, StatusCode::OK | StatusCode::CREATED) {
            debug!(provider = PROVIDER_NAME, %status, "Email accepted");
            return DeliveryReport::delivered("OK");
        }

        let text = response.text().await.unwrap_or_default();
        warn!(provider = PROVIDER_NAME, %status, body = %text, "Email rejected");
        DeliveryReport::rejected(PROVIDER_NAME, status, &text)
    }
}
