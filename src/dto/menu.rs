use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Dish, Extra};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDishRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: Option<String>,
    pub photo_url: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDishRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub photo_url: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateExtraRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub available: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateExtraRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct DishList {
    #[schema(value_type = Vec<Dish>)]
    pub items: Vec<Dish>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ExtraList {
    #[schema(value_type = Vec<Extra>)]
    pub items: Vec<Extra>,
}
