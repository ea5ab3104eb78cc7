//! Registration database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length of the optional record number.
pub const RECORD_NUMBER_MAX_CHARS: usize = 64;

/// Maximum length of the full name and account name.
pub const NAME_MAX_CHARS: usize = 120;

/// A persisted registration.
///
/// Rows are written once by the intake pipeline and never updated.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Registration {
    /// Store-assigned identifier.
    pub id: i64,
    /// Institutional record number; empty when not provided.
    pub record_number: String,
    /// Full name of the registrant.
    pub full_name: String,
    /// Account (login) name chosen by the registrant.
    pub account_name: String,
    /// Whether the registrant asked for the secondary distribution address
    /// to be notified.
    pub request_secondary_notification: bool,
    /// Unix epoch milliseconds (UTC) when the row was inserted.
    pub created_at: i64,
}

impl Registration {
    /// Name used when greeting or reporting on this registration.
    pub fn display_name(&self) -> &str {
        &self.full_name
    }
}

/// A validated registration that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub record_number: String,
    pub full_name: String,
    pub account_name: String,
    pub request_secondary_notification: bool,
    /// Unix epoch milliseconds (UTC) of the submission.
    pub created_at: i64,
}

impl NewRegistration {
    /// Attach the store-assigned id.
    pub fn into_registration(self, id: i64) -> Registration {
        Registration {
            id,
            record_number: self.record_number,
            full_name: self.full_name,
            account_name: self.account_name,
            request_secondary_notification: self.request_secondary_notification,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_registration_keeps_fields() {
        let new = NewRegistration {
            record_number: "SP123".to_string(),
            full_name: "Ana Silva".to_string(),
            account_name: "asilva".to_string(),
            request_secondary_notification: true,
            created_at: 1_700_000_000_000,
        };

        let registration = new.into_registration(7);
        assert_eq!(registration.id, 7);
        assert_eq!(registration.record_number, "SP123");
        assert_eq!(registration.display_name(), "Ana Silva");
        assert_eq!(registration.account_name, "asilva");
        assert!(registration.request_secondary_notification);
        assert_eq!(registration.created_at, 1_700_000_000_000);
    }
}
