use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod clients;
pub mod doc;
pub mod events;
pub mod health;
pub mod menu;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/clients", clients::router())
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/events", events::router())
        .nest("/admin", admin::router())
}
