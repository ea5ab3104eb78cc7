//! SendGrid v3 mail send API provider.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use super::{DeliveryReport, EmailProvider};
use crate::utils::http_client::build_provider_client;

const PROVIDER_NAME: &str = "SendGrid";

pub const DEFAULT_SENDGRID_API_BASE: &str = "https://api.sendgrid.com";

/// SendGrid provider configuration.
#[derive(Clone)]
pub struct SendGridConfig {
    /// API key, sent as a bearer token.
    pub api_key: Option<String>,
    /// API base URL, without the `/v3` suffix.
    pub api_base: String,
    /// Sender address.
    pub from_address: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_SENDGRID_API_BASE.to_string(),
            from_address: "no-reply@example.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for SendGridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("from_address", &self.from_address)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SendGrid email provider.
pub struct SendGridProvider {
    config: SendGridConfig,
    client: Client,
}

impl SendGridProvider {
    /// Create a new SendGrid provider.
    pub fn new(config: SendGridConfig) -> Self {
        let client = build_provider_client(PROVIDER_NAME, config.timeout);
        Self { config, client }
    }

    /// Build the JSON payload.
    fn build_payload(&self, to: &str, subject: &str, body: &str) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": to }], "subject": subject }],
            "from": { "email": self.config.from_address },
            "content": [{ "type": "text/plain", "value": body }]
        })
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> DeliveryReport {
        let Some(api_key) = &self.config.api_key else {
            return DeliveryReport::not_configured(PROVIDER_NAME);
        };

        let url = format!(
            "{}/v3/mail/send",
            self.config.api_base.trim_end_matches('/')
        );

        let response = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_payload(to, subject, body))
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
        if matches!(status, StatusCode::OK | StatusCode::ACCEPTED) {
            debug!(provider = PROVIDER_NAME, %status, "Email accepted");
            return DeliveryReport::delivered("OK");
        }

        let text = response.text().await.unwrap_or_default();
        warn!(provider = PROVIDER_NAME, %status, body = %text, "Email rejected");
        DeliveryReport::rejected(PROVIDER_NAME, status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::providers::test_support::{FakeApi, unreachable_base_url};

    fn configured(api_base: &str) -> SendGridConfig {
        SendGridConfig {
            api_key: Some("SG.secret".to_string()),
            api_base: api_base.to_string(),
            from_address: "no-reply@example.org".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_build_payload() {
        let provider = SendGridProvider::new(configured("http://localhost"));
        let payload = provider.build_payload("list@example.org", "Subject", "Body");

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "list@example.org"
        );
        assert_eq!(payload["personalizations"][0]["subject"], "Subject");
        assert_eq!(payload["from"]["email"], "no-reply@example.org");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][0]["value"], "Body");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let api = FakeApi::start(StatusCode::ACCEPTED, "").await;
        let mut config = configured(&api.base_url);
        config.api_key = None;
        let provider = SendGridProvider::new(config);

        assert!(!provider.is_configured());
        let report = provider.send("a@b.c", "s", "b").await;
        assert_eq!(report, DeliveryReport::failed("SendGrid not configured"));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_send_success() {
        let api = FakeApi::start(StatusCode::ACCEPTED, "").await;
        let provider = SendGridProvider::new(configured(&api.base_url));

        let report = provider.send("list@example.org", "Subject", "Body").await;
        assert_eq!(report, DeliveryReport::delivered("OK"));

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.path, "/v3/mail/send");
        assert_eq!(
            request.headers.get("authorization").unwrap(),
            "Bearer SG.secret"
        );
        let payload: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "list@example.org"
        );
    }

    #[tokio::test]
    async fn test_ok_counts_as_success() {
        let api = FakeApi::start(StatusCode::OK, "").await;
        let provider = SendGridProvider::new(configured(&api.base_url));

        assert!(provider.send("a@b.c", "s", "b").await.delivered);
    }

    #[tokio::test]
    async fn test_error_status_reports_code_and_body() {
        let api = FakeApi::start(
            StatusCode::BAD_REQUEST,
            r#"{"errors":[{"message":"invalid"}]}"#,
        )
        .await;
        let provider = SendGridProvider::new(configured(&api.base_url));

        let report = provider.send("a@b.c", "s", "b").await;
        assert!(!report.delivered);
        assert_eq!(
            report.detail,
            r#"SendGrid error 400: {"errors":[{"message":"invalid"}]}"#
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = SendGridProvider::new(configured(&unreachable_base_url().await));

        let report = provider.send("a@b.c", "s", "b").await;
        assert!(!report.delivered);
        assert!(report.detail.starts_with("SendGrid request failed"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let api =
            FakeApi::start_with_delay(StatusCode::ACCEPTED, "", Duration::from_secs(3)).await;
        let mut config = configured(&api.base_url);
        config.timeout = Duration::from_millis(200);
        let provider = SendGridProvider::new(config);

        let report = provider.send("a@b.c", "s", "b").await;
        assert!(!report.delivered);
        assert!(report.detail.starts_with("SendGrid request timed out"));
    }
}
