use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = ApiResponse<HealthData>),
        (status = 503, description = "Database unreachable", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthData>>) {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    if !database_ok {
        tracing::warn!("health check: database unreachable");
    }

    let (code, message, data) = if database_ok {
        (
            StatusCode::OK,
            "Service opérationnel",
            HealthData {
                status: "ok".to_string(),
                database: "ok".to_string(),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Base de données indisponible",
            HealthData {
                status: "degraded".to_string(),
                database: "unavailable".to_string(),
            },
        )
    };

    (code, Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}
