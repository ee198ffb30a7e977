use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::{clients, dishes, events, extras, order_items, orders},
    status::{DeliveryType, EventStatus, EventType, OrderStatus, PaymentStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Client {
    pub id: i32,
    pub auth_user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A main dish. Prices are in cents.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dish {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: Option<String>,
    pub photo_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Extra {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub client_id: i32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub delivery_type: DeliveryType,
    pub pickup_at: Option<DateTime<Utc>>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub dish_id: Option<i32>,
    pub extra_id: Option<i32>,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub line_total: i64,
    pub spice_level: Option<i16>,
    pub distribution: Option<String>,
    pub is_pinned: bool,
    pub is_offered: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i32,
    pub client_id: i32,
    pub event_type: EventType,
    pub status: EventStatus,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub guest_count: i32,
    pub budget: Option<i64>,
    pub location: Option<String>,
    pub preselected_dish_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<clients::Model> for Client {
    fn from(model: clients::Model) -> Self {
        Self {
            id: model.id,
            auth_user_id: model.auth_user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            postal_code: model.postal_code,
            city: model.city,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<dishes::Model> for Dish {
    fn from(model: dishes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category: model.category,
            photo_url: model.photo_url,
            available: model.available,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<extras::Model> for Extra {
    fn from(model: extras::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            available: model.available,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            status: model.status,
            payment_status: model.payment_status,
            delivery_type: model.delivery_type,
            pickup_at: model.pickup_at.map(|dt| dt.with_timezone(&Utc)),
            delivery_address: model.delivery_address,
            notes: model.notes,
            total_amount: model.total_amount,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        // Stored lines always fit: recompute_total rejects overflowing edits.
        let line_total = model.line_total().unwrap_or(i64::MAX);
        Self {
            id: model.id,
            order_id: model.order_id,
            dish_id: model.dish_id,
            extra_id: model.extra_id,
            name: model.name,
            unit_price: model.unit_price,
            quantity: model.quantity,
            line_total,
            spice_level: model.spice_level,
            distribution: model.distribution,
            is_pinned: model.is_pinned,
            is_offered: model.is_offered,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<events::Model> for Event {
    fn from(model: events::Model) -> Self {
        let preselected_dish_ids = model.dish_ids();
        Self {
            id: model.id,
            client_id: model.client_id,
            event_type: model.event_type,
            status: model.status,
            title: model.title,
            description: model.description,
            event_date: model.event_date.with_timezone(&Utc),
            guest_count: model.guest_count,
            budget: model.budget,
            location: model.location,
            preselected_dish_ids,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
