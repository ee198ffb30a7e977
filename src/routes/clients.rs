use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::clients::SyncClientRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Client,
    response::ApiResponse,
    services::client_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(sync_me))
}

#[utoipa::path(
    get,
    path = "/api/clients/me",
    responses(
        (status = 200, description = "Profile of the signed-in client", body = ApiResponse<Client>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No client profile yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::get_current_client(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/clients/me",
    request_body = SyncClientRequest,
    responses(
        (status = 200, description = "Create or update the signed-in client's profile", body = ApiResponse<Client>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff accounts have no client profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn sync_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SyncClientRequest>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::sync_current_client(&state, &user, payload).await?;
    Ok(Json(resp))
}
