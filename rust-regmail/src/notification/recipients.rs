//! Recipient classes and the rules deciding who gets notified.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RecipientsConfig;
use crate::database::models::Registration;

/// A named notification target category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RecipientClass {
    /// The institution's own mailbox.
    Institutional,
    /// An opt-in distribution address.
    Secondary,
}

impl RecipientClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Institutional => "institutional",
            Self::Secondary => "secondary",
        }
    }

    /// Human-readable label used in combined report messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Institutional => "Institutional",
            Self::Secondary => "Secondary",
        }
    }
}

impl fmt::Display for RecipientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a recipient class is targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Targeted for every registration.
    Always,
    /// Targeted only when the registration requests secondary notification.
    OnRequest,
}

/// Why a recipient class was not targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NotRequested,
    AddressNotConfigured,
}

/// Address source and inclusion rule for one recipient class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientPolicy {
    pub class: RecipientClass,
    pub address: Option<String>,
    pub inclusion: Inclusion,
}

impl RecipientPolicy {
    pub fn new(class: RecipientClass, address: Option<String>, inclusion: Inclusion) -> Self {
        Self {
            class,
            address,
            inclusion,
        }
    }

    /// Standard policies: the institutional address is always notified,
    /// the secondary address only on request.
    pub fn defaults(recipients: &RecipientsConfig) -> Vec<Self> {
        vec![
            Self::new(
                RecipientClass::Institutional,
                recipients.institutional.clone(),
                Inclusion::Always,
            ),
            Self::new(
                RecipientClass::Secondary,
                recipients.secondary.clone(),
                Inclusion::OnRequest,
            ),
        ]
    }

    /// Resolve the target address for `registration`, or the reason it is skipped.
    ///
    /// The opt-in check runs before the address check so that an unrequested
    /// secondary notification always reads "not requested".
    pub fn resolve(&self, registration: &Registration) -> Result<&str, Skip> {
        if self.inclusion == Inclusion::OnRequest && !registration.request_secondary_notification
        {
            return Err(Skip::NotRequested);
        }
        self.address.as_deref().ok_or(Skip::AddressNotConfigured)
    }

    /// Outcome detail for a skipped recipient.
    pub fn skip_detail(&self, skip: Skip) -> String {
        match skip {
            Skip::NotRequested => "not requested".to_string(),
            Skip::AddressNotConfigured => format!("{} address not configured", self.class),
        }
    }
}
