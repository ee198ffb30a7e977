//! Turning requested items into priced line items.
//!
//! Pure functions over already-loaded menu rows so the rules can be checked
//! without a database.

use std::collections::HashMap;

use crate::{
    dto::orders::{OrderItemInput, ProductRef, normalize_distribution},
    entity::{dishes, extras},
    error::{AppError, AppResult},
};

/// A line ready to insert, with name and unit price copied from the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLine {
    pub dish_id: Option<i32>,
    pub extra_id: Option<i32>,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub spice_level: Option<i16>,
    pub distribution: Option<String>,
}

impl NewLine {
    pub fn total(&self) -> AppResult<i64> {
        self.unit_price
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(amount_too_large)
    }
}

pub fn amount_too_large() -> AppError {
    AppError::bad_request("le montant de la commande est trop élevé")
}

/// Validate every input and collect the distinct dish and extra ids it names.
pub fn referenced_ids(items: &[OrderItemInput]) -> AppResult<(Vec<i32>, Vec<i32>)> {
    if items.is_empty() {
        return Err(AppError::bad_request(
            "la commande doit contenir au moins un article",
        ));
    }

    let mut dish_ids = Vec::new();
    let mut extra_ids = Vec::new();
    for item in items {
        match item.validate()? {
            ProductRef::Dish(id) => dish_ids.push(id),
            ProductRef::Extra(id) => extra_ids.push(id),
        }
    }
    dish_ids.sort_unstable();
    dish_ids.dedup();
    extra_ids.sort_unstable();
    extra_ids.dedup();
    Ok((dish_ids, extra_ids))
}

/// Price every input against the loaded menu. Fails on the first unknown or
/// unavailable product, so either all lines are built or none.
pub fn build_lines(
    items: &[OrderItemInput],
    dishes: &HashMap<i32, dishes::Model>,
    extras: &HashMap<i32, extras::Model>,
) -> AppResult<Vec<NewLine>> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let distribution = normalize_distribution(item.distribution.clone())?;
        let line = match item.validate()? {
            ProductRef::Dish(id) => {
                let dish = dishes
                    .get(&id)
                    .ok_or_else(|| AppError::bad_request(format!("plat introuvable : {id}")))?;
                if !dish.available {
                    return Err(AppError::bad_request(format!(
                        "le plat « {} » n'est pas disponible",
                        dish.name
                    )));
                }
                NewLine {
                    dish_id: Some(dish.id),
                    extra_id: None,
                    name: dish.name.clone(),
                    unit_price: dish.price,
                    quantity: item.quantity,
                    spice_level: item.spice_level,
                    distribution,
                }
            }
            ProductRef::Extra(id) => {
                let extra = extras
                    .get(&id)
                    .ok_or_else(|| AppError::bad_request(format!("extra introuvable : {id}")))?;
                if !extra.available {
                    return Err(AppError::bad_request(format!(
                        "l'extra « {} » n'est pas disponible",
                        extra.name
                    )));
                }
                NewLine {
                    dish_id: None,
                    extra_id: Some(extra.id),
                    name: extra.name.clone(),
                    unit_price: extra.price,
                    quantity: item.quantity,
                    spice_level: None,
                    distribution,
                }
            }
        };
        lines.push(line);
    }
    Ok(lines)
}

pub fn lines_total(lines: &[NewLine]) -> AppResult<i64> {
    lines.iter().try_fold(0i64, |total, line| {
        total.checked_add(line.total()?).ok_or_else(amount_too_large)
    })
}
