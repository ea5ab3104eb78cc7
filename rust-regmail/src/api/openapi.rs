//! OpenAPI documentation configuration.
//!
//! The generated document is served as JSON at `/api/docs/openapi.json`.

use utoipa::OpenApi;

use crate::api::error::ApiErrorResponse;
use crate::api::models::{
    ComponentHealth, HealthResponse, RegistrationListResponse, RegistrationResponse,
};
use crate::database::models::Registration;
use crate::notification::{NotificationOutcome, RecipientClass};
use crate::registration::RegistrationSubmission;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-regmail API",
        description = "Registration intake with email notification"
    ),
    paths(
        crate::api::routes::registrations::create_registration,
        crate::api::routes::registrations::list_registrations,
        crate::api::routes::health::health_check,
        crate::api::routes::health::readiness_check,
        crate::api::routes::health::liveness_check,
    ),
    components(
        schemas(
            RegistrationSubmission,
            RegistrationResponse,
            RegistrationListResponse,
            Registration,
            NotificationOutcome,
            RecipientClass,
            HealthResponse,
            ComponentHealth,
            ApiErrorResponse,
        )
    ),
    tags(
        (name = "registrations", description = "Registration intake"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/registrations"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.components.is_some());
    }
}
