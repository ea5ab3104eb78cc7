//! Health check routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::api::models::{ComponentHealth, HealthResponse};
use crate::api::server::AppState;
use crate::database;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

async fn database_health(state: &AppState) -> Option<ComponentHealth> {
    let pool = state.pool.as_ref()?;
    let (status, message) = match database::ping(pool).await {
        Ok(()) => ("healthy", None),
        Err(e) => ("unhealthy", Some(e.to_string())),
    };
    Some(ComponentHealth {
        name: "database".to_string(),
        status: status.to_string(),
        message,
    })
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let components: Vec<ComponentHealth> = database_health(&state).await.into_iter().collect();
    let status = if components.iter().all(|c| c.status == "healthy") {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        components,
    })
}

/// Readiness check - can the database be reached?
/// Returns HTTP 200 when ready, HTTP 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready"),
        (status = 503, description = "Not ready")
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match database_health(&state).await {
        Some(component) if component.status != "healthy" => {
            (StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
        _ => (StatusCode::OK, "ready"),
    }
}

/// Liveness check - is the service alive?
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Alive"))
)]
pub async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "uptime_secs": uptime
        })),
    )
}
