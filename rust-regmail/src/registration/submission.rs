//! Raw form input and its validation.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::database::models::{NAME_MAX_CHARS, NewRegistration, RECORD_NUMBER_MAX_CHARS};
use crate::{Error, Result};

/// Message returned when a required field is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "full name and account name are required";

/// Registration form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistrationSubmission {
    /// Optional institutional record number.
    #[serde(default)]
    pub record_number: Option<String>,
    /// Required.
    #[serde(default)]
    pub full_name: String,
    /// Required.
    #[serde(default)]
    pub account_name: String,
    /// Accepts a JSON boolean or an HTML checkbox value (`"on"`).
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub request_secondary_notification: bool,
}

impl RegistrationSubmission {
    /// Trim every text field and check the required ones.
    ///
    /// `created_at` is the submission time in Unix epoch milliseconds.
    pub fn validate(&self, created_at: i64) -> Result<NewRegistration> {
        let record_number = self
            .record_number
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let full_name = self.full_name.trim();
        let account_name = self.account_name.trim();

        if full_name.is_empty() || account_name.is_empty() {
            return Err(Error::validation(REQUIRED_FIELDS_MESSAGE));
        }

        check_length("record number", record_number, RECORD_NUMBER_MAX_CHARS)?;
        check_length("full name", full_name, NAME_MAX_CHARS)?;
        check_length("account name", account_name, NAME_MAX_CHARS)?;

        Ok(NewRegistration {
            record_number: record_number.to_string(),
            full_name: full_name.to_string(),
            account_name: account_name.to_string(),
            request_secondary_notification: self.request_secondary_notification,
            created_at,
        })
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or a checkbox value")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<bool, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<bool, E> {
            Ok(matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            ))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<bool, E> {
            Ok(false)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}
