//! HTTP API.
//!
//! Thin axum layer over [`crate::registration::RegistrationService`]: form or
//! JSON intake, a listing endpoint, health probes and the OpenAPI document.

pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerConfig, AppState};
