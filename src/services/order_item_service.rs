//! Back-office edits of the line items of an existing order.
//!
//! Every operation runs in one transaction that locks the order row, applies
//! the change and recomputes the order total before committing.

use sea_orm::sea_query::{LockType, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, ModelTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::orders::{
        OrderItemInput, OrderWithItems, ProductRef, merged_quantity, normalize_distribution,
        validate_quantity, validate_spice_level,
    },
    entity::{
        dishes::Entity as Dishes,
        extras::Entity as Extras,
        order_items::{self, ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{self, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    notify::ORDER_PATHS,
    response::ApiResponse,
    services::{
        order_lines::NewLine,
        order_service::{line_active, load_order_with_items, recompute_total},
    },
    state::AppState,
    status::Vocabulary,
};

async fn lock_open_order(txn: &DatabaseTransaction, order_id: i32) -> AppResult<orders::Model> {
    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "la commande est « {} » et ne peut plus être modifiée",
            order.status.label()
        )));
    }
    Ok(order)
}

/// Lines only merge when their kitchen instructions match.
fn distribution_filter(distribution: Option<&str>) -> SimpleExpr {
    match distribution {
        Some(text) => OrderItemCol::Distribution.eq(text),
        None => OrderItemCol::Distribution.is_null(),
    }
}

async fn find_item(
    txn: &DatabaseTransaction,
    order_id: i32,
    item_id: i32,
) -> AppResult<order_items::Model> {
    OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::Id.eq(item_id))
                .add(OrderItemCol::OrderId.eq(order_id)),
        )
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Recompute the total, commit, then run the best-effort side effects.
async fn finish(
    state: &AppState,
    user: &AuthUser,
    txn: DatabaseTransaction,
    order: orders::Model,
    action: &str,
    metadata: serde_json::Value,
) -> AppResult<OrderWithItems> {
    let order = recompute_total(&txn, order).await?;
    txn.commit().await?;

    tracing::debug!(order_id = order.id, action, total = order.total_amount, "order items changed");
    audit::record(&state.pool, Some(&user.subject), action, "order_items", metadata).await;
    state.notifier.revalidate(ORDER_PATHS).await;

    load_order_with_items(&state.orm, order).await
}

/// Add a dish or an extra depending on which id the input carries.
pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    input: OrderItemInput,
) -> AppResult<ApiResponse<OrderWithItems>> {
    match input.validate()? {
        ProductRef::Dish(_) => add_dish(state, user, order_id, input).await,
        ProductRef::Extra(_) => add_extra(state, user, order_id, input).await,
    }
}

/// Add a dish. A non-offered line for the same dish, spice level and
/// distribution has its quantity increased instead.
pub async fn add_dish(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    input: OrderItemInput,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let data = add_dish_inner(state, user, order_id, input)
        .await
        .map_err(|e| e.context("Impossible d'ajouter le plat"))?;
    Ok(ApiResponse::ok("Plat ajouté", data))
}

async fn add_dish_inner(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    input: OrderItemInput,
) -> AppResult<OrderWithItems> {
    let ProductRef::Dish(dish_id) = input.validate()? else {
        return Err(AppError::bad_request("un plat est attendu"));
    };
    let distribution = normalize_distribution(input.distribution)?;

    let txn = state.orm.begin().await?;
    let order = lock_open_order(&txn, order_id).await?;

    let dish = Dishes::find_by_id(dish_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("plat introuvable : {dish_id}")))?;
    if !dish.available {
        return Err(AppError::bad_request(format!(
            "le plat « {} » n'est pas disponible",
            dish.name
        )));
    }

    let spice_filter = match input.spice_level {
        Some(level) => OrderItemCol::SpiceLevel.eq(level),
        None => OrderItemCol::SpiceLevel.is_null(),
    };
    let existing = OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::OrderId.eq(order.id))
                .add(OrderItemCol::DishId.eq(dish.id))
                .add(OrderItemCol::IsOffered.eq(false))
                .add(spice_filter)
                .add(distribution_filter(distribution.as_deref())),
        )
        .one(&txn)
        .await?;

    let item_id = match existing {
        Some(item) => {
            let quantity = merged_quantity(item.quantity, input.quantity)?;
            let mut active: OrderItemActive = item.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?.id
        }
        None => {
            let line = NewLine {
                dish_id: Some(dish.id),
                extra_id: None,
                name: dish.name.clone(),
                unit_price: dish.price,
                quantity: input.quantity,
                spice_level: input.spice_level,
                distribution,
            };
            line_active(order.id, &line).insert(&txn).await?.id
        }
    };

    finish(
        state,
        user,
        txn,
        order,
        "order_item_add_dish",
        serde_json::json!({ "order_id": order_id, "item_id": item_id, "dish_id": dish_id }),
    )
    .await
}

/// Add an extra, merging into an existing non-offered line for it with the
/// same distribution.
pub async fn add_extra(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    input: OrderItemInput,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let data = add_extra_inner(state, user, order_id, input)
        .await
        .map_err(|e| e.context("Impossible d'ajouter l'extra"))?;
    Ok(ApiResponse::ok("Extra ajouté", data))
}

async fn add_extra_inner(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    input: OrderItemInput,
) -> AppResult<OrderWithItems> {
    let ProductRef::Extra(extra_id) = input.validate()? else {
        return Err(AppError::bad_request("un extra est attendu"));
    };
    let distribution = normalize_distribution(input.distribution)?;

    let txn = state.orm.begin().await?;
    let order = lock_open_order(&txn, order_id).await?;

    let extra = Extras::find_by_id(extra_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("extra introuvable : {extra_id}")))?;
    if !extra.available {
        return Err(AppError::bad_request(format!(
            "l'extra « {} » n'est pas disponible",
            extra.name
        )));
    }

    let existing = OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::OrderId.eq(order.id))
                .add(OrderItemCol::ExtraId.eq(extra.id))
                .add(OrderItemCol::IsOffered.eq(false))
                .add(distribution_filter(distribution.as_deref())),
        )
        .one(&txn)
        .await?;

    let item_id = match existing {
        Some(item) => {
            let quantity = merged_quantity(item.quantity, input.quantity)?;
            let mut active: OrderItemActive = item.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?.id
        }
        None => {
            let line = NewLine {
                dish_id: None,
                extra_id: Some(extra.id),
                name: extra.name.clone(),
                unit_price: extra.price,
                quantity: input.quantity,
                spice_level: None,
                distribution,
            };
            line_active(order.id, &line).insert(&txn).await?.id
        }
    };

    finish(
        state,
        user,
        txn,
        order,
        "order_item_add_extra",
        serde_json::json!({ "order_id": order_id, "item_id": item_id, "extra_id": extra_id }),
    )
    .await
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let data = remove_item_inner(state, user, order_id, item_id)
        .await
        .map_err(|e| e.context("Impossible de retirer l'article"))?;
    Ok(ApiResponse::ok("Article retiré", data))
}

async fn remove_item_inner(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;
    let order = lock_open_order(&txn, order_id).await?;
    let item = find_item(&txn, order_id, item_id).await?;
    item.delete(&txn).await?;

    finish(
        state,
        user,
        txn,
        order,
        "order_item_remove",
        serde_json::json!({ "order_id": order_id, "item_id": item_id }),
    )
    .await
}

/// The edits that touch a single existing line.
enum ItemEdit {
    Quantity(i32),
    SpiceLevel(Option<i16>),
    Distribution(Option<String>),
    TogglePin,
    ToggleOffered,
}

impl ItemEdit {
    fn action(&self) -> &'static str {
        match self {
            ItemEdit::Quantity(_) => "order_item_quantity",
            ItemEdit::SpiceLevel(_) => "order_item_spice_level",
            ItemEdit::Distribution(_) => "order_item_distribution",
            ItemEdit::TogglePin => "order_item_pin",
            ItemEdit::ToggleOffered => "order_item_offered",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            ItemEdit::Quantity(_) => "Impossible de modifier la quantité",
            ItemEdit::SpiceLevel(_) => "Impossible de modifier le niveau d'épice",
            ItemEdit::Distribution(_) => "Impossible de modifier la répartition",
            ItemEdit::TogglePin => "Impossible d'épingler l'article",
            ItemEdit::ToggleOffered => "Impossible de modifier l'article offert",
        }
    }

    fn apply(self, item: order_items::Model) -> AppResult<OrderItemActive> {
        let is_pinned = item.is_pinned;
        let is_offered = item.is_offered;
        let is_dish = item.dish_id.is_some();
        let mut active: OrderItemActive = item.into();
        match self {
            ItemEdit::Quantity(quantity) => {
                validate_quantity(quantity)?;
                active.quantity = Set(quantity);
            }
            ItemEdit::SpiceLevel(level) => {
                validate_spice_level(level)?;
                if level.is_some() && !is_dish {
                    return Err(AppError::bad_request(
                        "le niveau d'épice ne s'applique qu'aux plats",
                    ));
                }
                active.spice_level = Set(level);
            }
            ItemEdit::Distribution(text) => {
                active.distribution = Set(normalize_distribution(text)?);
            }
            ItemEdit::TogglePin => {
                active.is_pinned = Set(!is_pinned);
            }
            ItemEdit::ToggleOffered => {
                active.is_offered = Set(!is_offered);
            }
        }
        Ok(active)
    }
}

async fn edit_item(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
    edit: ItemEdit,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let failure = edit.failure_message();
    let data = edit_item_inner(state, user, order_id, item_id, edit)
        .await
        .map_err(|e| e.context(failure))?;
    Ok(ApiResponse::ok("Article mis à jour", data))
}

async fn edit_item_inner(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
    edit: ItemEdit,
) -> AppResult<OrderWithItems> {
    let action = edit.action();
    let txn = state.orm.begin().await?;
    let order = lock_open_order(&txn, order_id).await?;
    let item = find_item(&txn, order_id, item_id).await?;
    let updated = edit.apply(item)?.update(&txn).await?;

    finish(
        state,
        user,
        txn,
        order,
        action,
        serde_json::json!({
            "order_id": order_id,
            "item_id": updated.id,
            "quantity": updated.quantity,
            "spice_level": updated.spice_level,
            "is_pinned": updated.is_pinned,
            "is_offered": updated.is_offered,
        }),
    )
    .await
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
    quantity: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    edit_item(state, user, order_id, item_id, ItemEdit::Quantity(quantity)).await
}

pub async fn update_spice_level(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
    spice_level: Option<i16>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    edit_item(state, user, order_id, item_id, ItemEdit::SpiceLevel(spice_level)).await
}

pub async fn update_distribution(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
    distribution: Option<String>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    edit_item(state, user, order_id, item_id, ItemEdit::Distribution(distribution)).await
}

pub async fn toggle_pin(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    edit_item(state, user, order_id, item_id, ItemEdit::TogglePin).await
}

pub async fn toggle_offered(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    item_id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    edit_item(state, user, order_id, item_id, ItemEdit::ToggleOffered).await
}
