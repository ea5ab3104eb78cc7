//! Registration routes.
//!
//! `POST /api/registrations` accepts either a JSON body or an HTML form
//! (`application/x-www-form-urlencoded`).

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    routing::get,
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{RegistrationListResponse, RegistrationResponse};
use crate::api::server::AppState;
use crate::registration::{RegistrationService, RegistrationSubmission};

/// Create the registrations router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_registrations).post(create_registration))
}

fn registration_service(state: &AppState) -> ApiResult<&Arc<RegistrationService>> {
    state
        .registration_service
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Registration service not available"))
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"))
}

/// Decode the body as JSON or as a urlencoded form, by content type.
async fn read_submission(request: Request) -> ApiResult<RegistrationSubmission> {
    if is_json(&request) {
        let Json(submission) = Json::<RegistrationSubmission>::from_request(request, &())
            .await
            .map_err(|rejection| {
                ApiError::new(rejection.status(), "INVALID_BODY", rejection.body_text())
            })?;
        Ok(submission)
    } else {
        let Form(submission) = Form::<RegistrationSubmission>::from_request(request, &())
            .await
            .map_err(|rejection| {
                ApiError::new(rejection.status(), "INVALID_BODY", rejection.body_text())
            })?;
        Ok(submission)
    }
}

/// Register a new user and notify the configured recipients.
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = "registrations",
    request_body(
        content(
            (RegistrationSubmission = "application/json"),
            (RegistrationSubmission = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 201, description = "Registration stored", body = RegistrationResponse),
        (status = 422, description = "Validation error", body = crate::api::error::ApiErrorResponse),
        (status = 500, description = "Registration could not be saved", body = crate::api::error::ApiErrorResponse)
    )
)]
pub async fn create_registration(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<(StatusCode, Json<RegistrationResponse>)> {
    let service = registration_service(&state)?;
    let submission = read_submission(request).await?;

    let report = service.submit(submission).await?;

    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(report))))
}

/// List stored registrations with a greeting for the latest registrant.
#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "registrations",
    responses(
        (status = 200, description = "All registrations", body = RegistrationListResponse)
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
) -> ApiResult<Json<RegistrationListResponse>> {
    let service = registration_service(&state)?;

    let greeting = service.greeting().await?;
    let registrations = service.list().await?;

    Ok(Json(RegistrationListResponse {
        greeting,
        registrations,
    }))
}
