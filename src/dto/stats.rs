use serde::Serialize;
use utoipa::ToSchema;

use crate::status::OrderStatus;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopDish {
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

/// Back-office dashboard figures. Amounts in cents.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub order_count: i64,
    pub orders_by_status: Vec<StatusCount>,
    pub revenue: i64,
    pub average_basket: i64,
    pub client_count: i64,
    pub new_clients: i64,
    pub top_dishes: Vec<TopDish>,
    pub open_event_requests: i64,
}
