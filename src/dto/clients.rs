use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Client, Event, Order};

/// Profile sent by the customer app after sign-in; upserted by auth id.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SyncClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientSummary {
    pub client: Client,
    pub order_count: i64,
    pub total_spent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientList {
    pub items: Vec<ClientSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientDetail {
    pub client: Client,
    pub orders: Vec<Order>,
    pub events: Vec<Event>,
}
