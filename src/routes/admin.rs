use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};

use crate::{
    dto::{
        clients::{ClientDetail, ClientList, UpdateClientRequest},
        events::{EventList, EventWithClient, UpdateEventRequest},
        menu::{CreateDishRequest, CreateExtraRequest, UpdateDishRequest, UpdateExtraRequest},
        orders::{
            AdminCreateOrderRequest, OrderItemInput, OrderList, OrderWithItems,
            UpdateDistributionRequest, UpdateOrderRequest, UpdateQuantityRequest,
            UpdateSpiceLevelRequest,
        },
        stats::DashboardStats,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Client, Dish, Event, Extra},
    response::ApiResponse,
    routes::params::{ClientListQuery, EventListQuery, OrderListQuery, StatsQuery},
    services::{
        client_service, event_service, menu_service, order_item_service, order_service,
        stats_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route("/orders/{id}/items", post(add_item))
        .route("/orders/{id}/items/{item_id}", delete(remove_item))
        .route("/orders/{id}/items/{item_id}/quantity", patch(update_item_quantity))
        .route("/orders/{id}/items/{item_id}/spice-level", patch(update_item_spice_level))
        .route("/orders/{id}/items/{item_id}/distribution", patch(update_item_distribution))
        .route("/orders/{id}/items/{item_id}/pin", post(toggle_item_pin))
        .route("/orders/{id}/items/{item_id}/offered", post(toggle_item_offered))
        .route("/clients", get(list_clients))
        .route(
            "/clients/{id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
        .route("/dishes", post(create_dish))
        .route("/dishes/{id}", patch(update_dish).delete(delete_dish))
        .route("/extras", post(create_extra))
        .route("/extras/{id}", patch(update_extra).delete(delete_extra))
        .route("/events", get(list_events))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/stats", get(dashboard_stats))
}

// ---- orders ----

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
        ("client_id" = Option<i32>, Query, description = "Filter by client"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders",
    request_body = AdminCreateOrderRequest,
    responses(
        (status = 201, description = "Order entered for a client", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid order"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AdminCreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let resp = order_service::create_order_for_client(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with client and items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Delivery order without an address"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Status change not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::update_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}

// ---- order items ----

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/items",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderItemInput,
    responses(
        (status = 200, description = "Item added, order recomputed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid item"),
        (status = 409, description = "Order is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<OrderItemInput>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_item_service::add_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Order is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_item_service::remove_item(&state, &user, id, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/items/{item_id}/quantity",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity changed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Quantity must be positive")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_item_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp =
        order_item_service::update_quantity(&state, &user, id, item_id, payload.quantity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/items/{item_id}/spice-level",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    request_body = UpdateSpiceLevelRequest,
    responses(
        (status = 200, description = "Spice level changed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Spice level out of range")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_item_spice_level(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateSpiceLevelRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp =
        order_item_service::update_spice_level(&state, &user, id, item_id, payload.spice_level)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/items/{item_id}/distribution",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    request_body = UpdateDistributionRequest,
    responses(
        (status = 200, description = "Distribution note changed", body = ApiResponse<OrderWithItems>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_item_distribution(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateDistributionRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp =
        order_item_service::update_distribution(&state, &user, id, item_id, payload.distribution)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/items/{item_id}/pin",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Pin toggled", body = ApiResponse<OrderWithItems>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_item_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_item_service::toggle_pin(&state, &user, id, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/items/{item_id}/offered",
    params(
        ("id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Offered flag toggled, total recomputed", body = ApiResponse<OrderWithItems>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_item_offered(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_item_service::toggle_offered(&state, &user, id, item_id).await?;
    Ok(Json(resp))
}

// ---- clients ----

#[utoipa::path(
    get,
    path = "/api/admin/clients",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search by name, email or phone")
    ),
    responses(
        (status = 200, description = "Clients with order totals", body = ApiResponse<ClientList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ClientListQuery>,
) -> AppResult<Json<ApiResponse<ClientList>>> {
    let resp = client_service::list_clients(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client with orders and events", body = ApiResponse<ClientDetail>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ClientDetail>>> {
    let resp = client_service::get_client(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<Client>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClientRequest>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::update_client(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client and their history deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = client_service::delete_client(&state, &user, id).await?;
    Ok(Json(resp))
}

// ---- menu ----

#[utoipa::path(
    post,
    path = "/api/admin/dishes",
    request_body = CreateDishRequest,
    responses(
        (status = 201, description = "Dish created", body = ApiResponse<Dish>),
        (status = 409, description = "Name already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_dish(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDishRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Dish>>)> {
    let resp = menu_service::create_dish(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/dishes/{id}",
    params(("id" = i32, Path, description = "Dish id")),
    request_body = UpdateDishRequest,
    responses(
        (status = 200, description = "Dish updated", body = ApiResponse<Dish>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_dish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDishRequest>,
) -> AppResult<Json<ApiResponse<Dish>>> {
    let resp = menu_service::update_dish(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/dishes/{id}",
    params(("id" = i32, Path, description = "Dish id")),
    responses(
        (status = 200, description = "Dish deleted", body = ApiResponse<serde_json::Value>),
        (status = 409, description = "Dish appears in orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_dish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_dish(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/extras",
    request_body = CreateExtraRequest,
    responses(
        (status = 201, description = "Extra created", body = ApiResponse<Extra>),
        (status = 409, description = "Name already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_extra(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateExtraRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Extra>>)> {
    let resp = menu_service::create_extra(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/extras/{id}",
    params(("id" = i32, Path, description = "Extra id")),
    request_body = UpdateExtraRequest,
    responses(
        (status = 200, description = "Extra updated", body = ApiResponse<Extra>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_extra(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateExtraRequest>,
) -> AppResult<Json<ApiResponse<Extra>>> {
    let resp = menu_service::update_extra(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/extras/{id}",
    params(("id" = i32, Path, description = "Extra id")),
    responses(
        (status = 200, description = "Extra deleted", body = ApiResponse<serde_json::Value>),
        (status = 409, description = "Extra appears in orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_extra(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_extra(&state, &user, id).await?;
    Ok(Json(resp))
}

// ---- events ----

#[utoipa::path(
    get,
    path = "/api/admin/events",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
        ("event_type" = Option<String>, Query, description = "Filter by event type label"),
        ("sort_order" = Option<String>, Query, description = "Sort by event date: asc, desc")
    ),
    responses(
        (status = 200, description = "Event requests", body = ApiResponse<EventList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<EventListQuery>,
) -> AppResult<Json<ApiResponse<EventList>>> {
    let resp = event_service::list_events(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event with client", body = ApiResponse<EventWithClient>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<EventWithClient>>> {
    let resp = event_service::get_event(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<Event>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEventRequest>,
) -> AppResult<Json<ApiResponse<Event>>> {
    let resp = event_service::update_event(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = event_service::delete_event(&state, &user, id).await?;
    Ok(Json(resp))
}

// ---- stats ----

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    params(
        ("from" = Option<String>, Query, description = "Window start (RFC 3339), default 30 days before `to`"),
        ("to" = Option<String>, Query, description = "Window end, exclusive (RFC 3339), default now")
    ),
    responses(
        (status = 200, description = "Dashboard figures", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = stats_service::dashboard_stats(&state, &user, query).await?;
    Ok(Json(resp))
}
