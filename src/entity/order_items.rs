use sea_orm::entity::prelude::*;

/// One dish or extra within an order. `name` and `unit_price` are copied
/// from the menu when the line is created.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub dish_id: Option<i32>,
    pub extra_id: Option<i32>,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub spice_level: Option<i16>,
    pub distribution: Option<String>,
    pub is_pinned: bool,
    pub is_offered: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Amount this line adds to the order total, `None` on overflow.
    pub fn line_total(&self) -> Option<i64> {
        if self.is_offered {
            Some(0)
        } else {
            self.unit_price.checked_mul(i64::from(self.quantity))
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::dishes::Entity",
        from = "Column::DishId",
        to = "super::dishes::Column::Id"
    )]
    Dishes,
    #[sea_orm(
        belongs_to = "super::extras::Entity",
        from = "Column::ExtraId",
        to = "super::extras::Column::Id"
    )]
    Extras,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dishes.def()
    }
}

impl Related<super::extras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Extras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
