//! Process configuration.
//!
//! Everything is read once at startup from environment variables (a `.env`
//! file is honoured through `dotenvy` in `main`). Blank values are treated as
//! absent. A missing value only disables the provider or recipient that
//! depends on it.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::notification::providers::{MailgunConfig, SendGridConfig};
use crate::{Error, Result};

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:regmail.db?mode=rwc";

/// Default distribution address for opt-in notifications.
pub const DEFAULT_SECONDARY_EMAIL: &str = "flaskaulasweb@zohomail.com";

/// Default per-request timeout for email providers.
pub const DEFAULT_EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification target addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientsConfig {
    /// Always notified when present.
    pub institutional: Option<String>,
    /// Notified only when the registration asks for it.
    pub secondary: Option<String>,
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mailgun: MailgunConfig,
    pub sendgrid: SendGridConfig,
    pub recipients: RecipientsConfig,
    pub database_url: String,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        let timeout = match get("EMAIL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    Error::config(format!("EMAIL_TIMEOUT_SECS must be an integer: {}", e))
                })?;
                if secs == 0 {
                    return Err(Error::config("EMAIL_TIMEOUT_SECS must be greater than 0"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_EMAIL_TIMEOUT,
        };

        let mailgun_domain = get("MAILGUN_DOMAIN");
        let sender = get("MAIL_SENDER").unwrap_or_else(|| match &mailgun_domain {
            Some(domain) => format!("no-reply@{}", domain),
            None => "no-reply@example.com".to_string(),
        });

        let mut mailgun = MailgunConfig {
            api_key: get("MAILGUN_API_KEY"),
            domain: mailgun_domain,
            from_address: sender.clone(),
            timeout,
            ..Default::default()
        };
        if let Some(base) = get("MAILGUN_API_BASE") {
            mailgun.api_base = base;
        }

        let mut sendgrid = SendGridConfig {
            api_key: get("SENDGRID_API_KEY"),
            from_address: sender,
            timeout,
            ..Default::default()
        };
        if let Some(base) = get("SENDGRID_API_BASE") {
            sendgrid.api_base = base;
        }

        // An explicitly blank SECONDARY_EMAIL disables the opt-in recipient.
        let secondary = match lookup("SECONDARY_EMAIL") {
            Some(value) => non_blank(Some(value)),
            None => Some(DEFAULT_SECONDARY_EMAIL.to_string()),
        };

        let recipients = RecipientsConfig {
            institutional: get("INSTITUTIONAL_EMAIL"),
            secondary,
        };

        Ok(Self {
            mailgun,
            sendgrid,
            recipients,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_dir: get("LOG_DIR").map(PathBuf::from),
        })
    }

    /// Warn about missing recipient settings.
    pub fn log_summary(&self) {
        if self.recipients.institutional.is_none() {
            warn!("INSTITUTIONAL_EMAIL is not set; institutional notifications are disabled");
        }
        debug!(
            sender = %self.mailgun.from_address,
            secondary = ?self.recipients.secondary,
            timeout_secs = self.mailgun.timeout.as_secs(),
            "Email configuration loaded"
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
