//! API route modules.

pub mod health;
pub mod registrations;

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::api::openapi::ApiDoc;
use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/registrations", registrations::router())
        .nest("/health", health::router())
        .route("/api/docs/openapi.json", get(openapi_json))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
