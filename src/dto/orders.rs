use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{Client, Order, OrderItem},
    status::{DeliveryType, OrderStatus, PaymentStatus},
};

pub const MAX_SPICE_LEVEL: i16 = 3;
pub const MAX_QUANTITY: i32 = 999;
pub const MAX_DISTRIBUTION_LEN: usize = 255;

/// One requested line: exactly one of `dish_id` / `extra_id`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub dish_id: Option<i32>,
    pub extra_id: Option<i32>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub spice_level: Option<i16>,
    pub distribution: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductRef {
    Dish(i32),
    Extra(i32),
}

impl OrderItemInput {
    pub fn dish(dish_id: i32, quantity: i32) -> Self {
        Self {
            dish_id: Some(dish_id),
            extra_id: None,
            quantity,
            spice_level: None,
            distribution: None,
        }
    }

    pub fn extra(extra_id: i32, quantity: i32) -> Self {
        Self {
            dish_id: None,
            extra_id: Some(extra_id),
            quantity,
            spice_level: None,
            distribution: None,
        }
    }

    pub fn product(&self) -> Result<ProductRef, AppError> {
        match (self.dish_id, self.extra_id) {
            (Some(id), None) => Ok(ProductRef::Dish(id)),
            (None, Some(id)) => Ok(ProductRef::Extra(id)),
            _ => Err(AppError::bad_request(
                "chaque article doit référencer un plat ou un extra",
            )),
        }
    }

    /// Check every field and return the referenced product.
    pub fn validate(&self) -> Result<ProductRef, AppError> {
        let product = self.product()?;
        validate_quantity(self.quantity)?;
        validate_spice_level(self.spice_level)?;
        if matches!(product, ProductRef::Extra(_)) && self.spice_level.is_some() {
            return Err(AppError::bad_request(
                "le niveau d'épice ne s'applique qu'aux plats",
            ));
        }
        normalize_distribution(self.distribution.clone())?;
        Ok(product)
    }
}

pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::bad_request("la quantité doit être supérieure à 0"));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::bad_request(format!(
            "la quantité ne doit pas dépasser {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

/// Quantity of a line after `added` more units are merged into it.
pub fn merged_quantity(current: i32, added: i32) -> Result<i32, AppError> {
    let quantity = current.checked_add(added).ok_or_else(|| {
        AppError::bad_request(format!("la quantité ne doit pas dépasser {MAX_QUANTITY}"))
    })?;
    validate_quantity(quantity)?;
    Ok(quantity)
}

pub fn validate_spice_level(level: Option<i16>) -> Result<(), AppError> {
    match level {
        Some(l) if !(0..=MAX_SPICE_LEVEL).contains(&l) => Err(AppError::bad_request(format!(
            "le niveau d'épice doit être compris entre 0 et {MAX_SPICE_LEVEL}"
        ))),
        _ => Ok(()),
    }
}

/// Trim the text; blank means no instructions.
pub fn normalize_distribution(distribution: Option<String>) -> Result<Option<String>, AppError> {
    let Some(text) = distribution else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > MAX_DISTRIBUTION_LEN {
        return Err(AppError::bad_request(format!(
            "la répartition ne doit pas dépasser {MAX_DISTRIBUTION_LEN} caractères"
        )));
    }
    Ok(Some(text.to_string()))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    #[serde(default = "default_delivery_type")]
    pub delivery_type: DeliveryType,
    pub pickup_at: Option<DateTime<Utc>>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

fn default_delivery_type() -> DeliveryType {
    DeliveryType::Takeaway
}

/// Staff-side order entry on behalf of a client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminCreateOrderRequest {
    pub client_id: i32,
    #[serde(flatten)]
    pub order: CreateOrderRequest,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_type: Option<DeliveryType>,
    pub pickup_at: Option<DateTime<Utc>>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSpiceLevelRequest {
    pub spice_level: Option<i16>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDistributionRequest {
    pub distribution: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub client: Option<Client>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order: Order,
    pub client_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderHistory {
    pub items: Vec<OrderWithItems>,
}
