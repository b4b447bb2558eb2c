//! Health check endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::api::{ErrorDto, HealthDto},
    server::{error::error_response, model::app::AppState},
};

/// OpenAPI tag for the health endpoint.
pub static HEALTH_TAG: &str = "health";

/// Liveness check, including database connectivity
#[utoipa::path(
    get,
    path = "/api/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = HealthDto),
        (status = 503, description = "Database unreachable", body = ErrorDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.db.ping().await {
        tracing::error!("Health check failed to reach database: {}", e);

        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    (
        StatusCode::OK,
        Json(HealthDto {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}
