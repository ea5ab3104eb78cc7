//! Scripted providers for exercising the dispatch pipeline without HTTP.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::providers::{DeliveryReport, EmailProvider};

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub provider: &'static str,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Shared log of calls across several providers, in call order.
pub type CallLog = Arc<Mutex<Vec<SentMail>>>;

/// Provider answering every call with the same report.
pub struct ScriptedProvider {
    name: &'static str,
    report: DeliveryReport,
    log: CallLog,
}

impl ScriptedProvider {
    pub fn succeeding(name: &'static str, log: &CallLog) -> Arc<dyn EmailProvider> {
        Arc::new(Self {
            name,
            report: DeliveryReport::delivered("OK"),
            log: log.clone(),
        })
    }

    pub fn failing(name: &'static str, detail: &str, log: &CallLog) -> Arc<dyn EmailProvider> {
        Arc::new(Self {
            name,
            report: DeliveryReport::failed(detail),
            log: log.clone(),
        })
    }
}

#[async_trait]
impl EmailProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> DeliveryReport {
        self.log.lock().unwrap().push(SentMail {
            provider: self.name,
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        self.report.clone()
    }
}

pub fn call_log() -> CallLog {
    Arc::default()
}

pub fn calls(log: &CallLog) -> Vec<SentMail> {
    log.lock().unwrap().clone()
}
