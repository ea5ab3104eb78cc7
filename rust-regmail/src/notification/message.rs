//! Notification message template.

use crate::database::models::Registration;

/// Subject and plain-text body sent for a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    /// Render the fixed template for `registration`.
    pub fn for_registration(registration: &Registration) -> Self {
        let subject = format!(
            "New registration: {} ({})",
            registration.full_name, registration.account_name
        );
        let body = format!(
            "New user registered\n\n\
             Record number: {}\n\
             Full name: {}\n\
             Account name: {}\n",
            registration.record_number, registration.full_name, registration.account_name
        );
        Self { subject, body }
    }
}
