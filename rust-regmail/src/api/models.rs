//! API request/response DTOs.

use serde::Serialize;

use crate::database::models::Registration;
use crate::notification::NotificationOutcome;
use crate::registration::RegistrationReport;

/// Response for an accepted registration.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RegistrationResponse {
    /// Store-assigned id of the new registration.
    pub id: i64,
    /// Name to greet the registrant with.
    pub display_name: String,
    /// Combined summary of the registration and its notifications.
    pub message: String,
    /// One entry per recipient class.
    pub outcomes: Vec<NotificationOutcome>,
}

impl From<RegistrationReport> for RegistrationResponse {
    fn from(report: RegistrationReport) -> Self {
        Self {
            id: report.registration.id,
            display_name: report.registration.full_name,
            message: report.message,
            outcomes: report.outcomes.into_vec(),
        }
    }
}

/// Listing of every registration.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RegistrationListResponse {
    /// Full name of the latest registrant, or "Stranger".
    pub greeting: String,
    pub registrations: Vec<Registration>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub components: Vec<ComponentHealth>,
}

/// Component health status.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
}
