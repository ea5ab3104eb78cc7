//! Registration service: validate, persist, notify, report.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::submission::RegistrationSubmission;
use crate::Result;
use crate::database::models::Registration;
use crate::database::repositories::RegistrationRepository;
use crate::notification::{NotificationDispatcher, NotificationOutcomes};

/// Greeting used when nobody has registered yet.
pub const DEFAULT_GREETING: &str = "Stranger";

/// Processing stage of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validated,
    Persisted,
    Notified,
    Reported,
    Rejected,
}

impl SubmissionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Persisted => "persisted",
            Self::Notified => "notified",
            Self::Reported => "reported",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the caller learns about an accepted submission.
#[derive(Debug, Clone)]
pub struct RegistrationReport {
    pub registration: Registration,
    pub outcomes: NotificationOutcomes,
    /// Combined human-readable summary.
    pub message: String,
}

impl RegistrationReport {
    fn new(registration: Registration, outcomes: NotificationOutcomes) -> Self {
        let mut message = format!("Registered: {}", registration.display_name());
        for outcome in outcomes.iter() {
            message.push_str(&format!(
                ". {} email: {}",
                outcome.recipient_class.label(),
                outcome.detail
            ));
        }
        Self {
            registration,
            outcomes,
            message,
        }
    }

    pub fn display_name(&self) -> &str {
        self.registration.display_name()
    }
}

/// Orchestrates the registration pipeline.
pub struct RegistrationService {
    repository: Arc<dyn RegistrationRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl RegistrationService {
    pub fn new(
        repository: Arc<dyn RegistrationRepository>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Process one submission end to end.
    ///
    /// Returns `Error::Validation` when required fields are missing (nothing
    /// is written, nobody is notified) and a database error when the insert
    /// fails (nobody is notified). Notification failures never surface as
    /// errors.
    pub async fn submit(&self, submission: RegistrationSubmission) -> Result<RegistrationReport> {
        let mut stage = SubmissionStage::Received;
        debug!(%stage, account = %submission.account_name.trim(), "Registration submitted");

        let new = match submission.validate(Utc::now().timestamp_millis()) {
            Ok(new) => new,
            Err(e) => {
                stage = SubmissionStage::Rejected;
                info!(%stage, error = %e, "Registration rejected");
                return Err(e);
            }
        };
        stage = SubmissionStage::Validated;
        debug!(%stage, "Registration validated");

        let id = match self.repository.insert(&new).await {
            Ok(id) => id,
            Err(e) => {
                warn!(%stage, error = %e, "Failed to persist registration");
                return Err(e);
            }
        };
        let registration = new.into_registration(id);
        stage = SubmissionStage::Persisted;
        info!(
            %stage,
            registration_id = id,
            full_name = %registration.full_name,
            account = %registration.account_name,
            "Registration persisted"
        );

        let outcomes = self.dispatcher.dispatch(&registration).await;
        stage = SubmissionStage::Notified;
        debug!(%stage, registration_id = id, outcomes = outcomes.len(), "Notifications attempted");

        let report = RegistrationReport::new(registration, outcomes);
        stage = SubmissionStage::Reported;
        info!(%stage, registration_id = id, message = %report.message, "Registration completed");

        Ok(report)
    }

    /// All registrations ordered by id.
    pub async fn list(&self) -> Result<Vec<Registration>> {
        self.repository.list_all().await
    }

    /// Display name of the most recent registration, or [`DEFAULT_GREETING`].
    pub async fn greeting(&self) -> Result<String> {
        Ok(self
            .repository
            .latest()
            .await?
            .map(|r| r.full_name)
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()))
    }
}
