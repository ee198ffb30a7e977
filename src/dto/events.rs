use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Client, Event},
    status::{EventStatus, EventType},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub event_type: EventType,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub guest_count: i32,
    pub budget: Option<i64>,
    pub location: Option<String>,
    #[serde(default)]
    pub preselected_dish_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub guest_count: Option<i32>,
    pub budget: Option<i64>,
    pub location: Option<String>,
    pub preselected_dish_ids: Option<Vec<i32>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventWithClient {
    pub event: Event,
    pub client: Option<Client>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventList {
    pub items: Vec<EventWithClient>,
}
