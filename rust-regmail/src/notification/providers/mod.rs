//! Email provider clients.
//!
//! Each provider wraps one transactional-email HTTP API behind the
//! [`EmailProvider`] trait:
//! - Mailgun (`POST /v3/{domain}/messages`, form encoded, basic auth)
//! - SendGrid (`POST /v3/mail/send`, JSON, bearer token)
//!
//! Providers never return errors. An unconfigured provider, a transport
//! failure, a timeout or a non-success status all come back as a
//! [`DeliveryReport`] with `delivered == false`.

mod mailgun;
mod sendgrid;

pub use mailgun::{MailgunConfig, MailgunProvider};
pub use sendgrid::{SendGridConfig, SendGridProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Upper bound for provider response bodies embedded in failure details.
const MAX_DETAIL_BODY_CHARS: usize = 300;

/// Result of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: bool,
    pub detail: String,
}

impl DeliveryReport {
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }

    /// Report for a provider that lacks credentials; no request was made.
    pub fn not_configured(provider: &str) -> Self {
        Self::failed(format!("{} not configured", provider))
    }

    /// Report for an HTTP response outside the provider's success codes.
    pub(crate) fn rejected(provider: &str, status: reqwest::StatusCode, body: &str) -> Self {
        Self::failed(format!(
            "{} error {}: {}",
            provider,
            status.as_u16(),
            truncate_body(body.trim())
        ))
    }

    /// Report for a request that never produced a response (network, timeout).
    pub(crate) fn transport(provider: &str, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            "timed out"
        } else {
            "failed"
        };
        Self::failed(format!("{} request {}: {}", provider, kind, error))
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_DETAIL_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_DETAIL_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// A transactional-email delivery API.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Provider name used in outcome details and logs.
    fn name(&self) -> &'static str;

    /// Whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool;

    /// Send a plain-text message to a single recipient.
    ///
    /// Performs at most one HTTP request and never retries.
    async fn send(&self, to: &str, subject: &str, body: &str) -> DeliveryReport;
}
