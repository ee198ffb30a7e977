use sea_orm::entity::prelude::*;

use crate::status::{EventStatus, EventType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub event_type: EventType,
    pub status: EventStatus,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTimeWithTimeZone,
    pub guest_count: i32,
    pub budget: Option<i64>,
    pub location: Option<String>,
    /// JSON array of dish ids.
    pub preselected_dish_ids: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn dish_ids(&self) -> Vec<i32> {
        serde_json::from_value(self.preselected_dish_ids.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_delete = "Cascade"
    )]
    Clients,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
