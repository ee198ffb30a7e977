use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::menu::{DishList, ExtraList},
    error::AppResult,
    models::Dish,
    response::ApiResponse,
    routes::params::DishQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dishes))
        .route("/dishes/{id}", get(get_dish))
        .route("/extras", get(list_extras))
}

#[utoipa::path(
    get,
    path = "/api/menu/dishes",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("include_unavailable" = Option<bool>, Query, description = "Also list unavailable dishes")
    ),
    responses(
        (status = 200, description = "Dishes on the menu", body = ApiResponse<DishList>)
    ),
    tag = "Menu"
)]
pub async fn list_dishes(
    State(state): State<AppState>,
    Query(query): Query<DishQuery>,
) -> AppResult<Json<ApiResponse<DishList>>> {
    let resp = menu_service::list_dishes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/dishes/{id}",
    params(("id" = i32, Path, description = "Dish id")),
    responses(
        (status = 200, description = "Dish detail", body = ApiResponse<Dish>),
        (status = 404, description = "Not found")
    ),
    tag = "Menu"
)]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Dish>>> {
    let resp = menu_service::get_dish(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/extras",
    responses(
        (status = 200, description = "Available extras", body = ApiResponse<ExtraList>)
    ),
    tag = "Menu"
)]
pub async fn list_extras(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ExtraList>>> {
    let resp = menu_service::list_extras(&state).await?;
    Ok(Json(resp))
}
