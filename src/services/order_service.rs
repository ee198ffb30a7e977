use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::orders::{
        AdminCreateOrderRequest, CreateOrderRequest, OrderHistory, OrderList, OrderSummary,
        OrderWithItems, UpdateOrderRequest,
    },
    entity::{
        clients::{self, Column as ClientCol, Entity as Clients},
        dishes::{self, Column as DishCol, Entity as Dishes},
        extras::{self, Column as ExtraCol, Entity as Extras},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderItem,
    notify::{ORDER_PATHS, StatusNotification},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination, SortOrder},
    services::order_lines::{NewLine, amount_too_large, build_lines, lines_total, referenced_ids},
    state::AppState,
    status::{DeliveryType, OrderStatus, PaymentStatus, Vocabulary},
};

/// How a caller designates the client an order belongs to.
#[derive(Debug, Clone)]
pub enum ClientRef {
    Id(i32),
    AuthId(String),
}

pub async fn resolve_client<C: ConnectionTrait>(
    db: &C,
    client: &ClientRef,
) -> AppResult<clients::Model> {
    let found = match client {
        ClientRef::Id(id) => Clients::find_by_id(*id).one(db).await?,
        ClientRef::AuthId(auth_id) => {
            Clients::find()
                .filter(ClientCol::AuthUserId.eq(auth_id.as_str()))
                .one(db)
                .await?
        }
    };
    found.ok_or_else(|| AppError::bad_request("client introuvable"))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    client: ClientRef,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let created = create_order_inner(state, client, payload)
        .await
        .map_err(|e| e.context("Impossible de créer la commande"))?;

    tracing::info!(
        order_id = created.order.id,
        client_id = created.order.client_id,
        total = created.order.total_amount,
        items = created.items.len(),
        "order created"
    );

    audit::record(
        &state.pool,
        Some(&user.subject),
        "order_create",
        "orders",
        serde_json::json!({ "order_id": created.order.id, "total": created.order.total_amount }),
    )
    .await;
    state.notifier.revalidate(ORDER_PATHS).await;

    Ok(ApiResponse::ok("Commande créée", created))
}

/// Order entered by staff on behalf of an existing client.
pub async fn create_order_for_client(
    state: &AppState,
    user: &AuthUser,
    payload: AdminCreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    create_order(state, user, ClientRef::Id(payload.client_id), payload.order).await
}

async fn create_order_inner(
    state: &AppState,
    client: ClientRef,
    payload: CreateOrderRequest,
) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;

    let client = resolve_client(&txn, &client).await?;
    let (dish_ids, extra_ids) = referenced_ids(&payload.items)?;

    let dishes: HashMap<i32, dishes::Model> = if dish_ids.is_empty() {
        HashMap::new()
    } else {
        Dishes::find()
            .filter(DishCol::Id.is_in(dish_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect()
    };
    let extras: HashMap<i32, extras::Model> = if extra_ids.is_empty() {
        HashMap::new()
    } else {
        Extras::find()
            .filter(ExtraCol::Id.is_in(extra_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect()
    };

    let lines = build_lines(&payload.items, &dishes, &extras)?;
    let total_amount = lines_total(&lines)?;
    let delivery_address = resolve_delivery_address(
        payload.delivery_type,
        payload.delivery_address,
        &client,
    )?;

    let order = OrderActive {
        id: NotSet,
        client_id: Set(client.id),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        delivery_type: Set(payload.delivery_type),
        pickup_at: Set(payload.pickup_at.map(Into::into)),
        delivery_address: Set(delivery_address),
        notes: Set(clean_text(payload.notes)),
        total_amount: Set(total_amount),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in &lines {
        let item = line_active(order.id, line).insert(&txn).await?;
        items.push(item.into());
    }

    txn.commit().await?;

    Ok(OrderWithItems {
        order: order.into(),
        client: Some(client.into()),
        items,
    })
}

pub(crate) fn line_active(order_id: i32, line: &NewLine) -> OrderItemActive {
    OrderItemActive {
        id: NotSet,
        order_id: Set(order_id),
        dish_id: Set(line.dish_id),
        extra_id: Set(line.extra_id),
        name: Set(line.name.clone()),
        unit_price: Set(line.unit_price),
        quantity: Set(line.quantity),
        spice_level: Set(line.spice_level),
        distribution: Set(line.distribution.clone()),
        is_pinned: Set(false),
        is_offered: Set(false),
        created_at: NotSet,
    }
}

/// Delivery orders need an address: the one given, else the client's.
fn resolve_delivery_address(
    delivery_type: DeliveryType,
    requested: Option<String>,
    client: &clients::Model,
) -> AppResult<Option<String>> {
    let requested = clean_text(requested);
    if delivery_type != DeliveryType::Delivery {
        return Ok(requested);
    }
    if requested.is_some() {
        return Ok(requested);
    }
    match (&client.address, &client.postal_code, &client.city) {
        (Some(address), postal_code, city) if !address.trim().is_empty() => {
            let locality = [postal_code.as_deref(), city.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if locality.is_empty() {
                Ok(Some(address.trim().to_string()))
            } else {
                Ok(Some(format!("{}, {}", address.trim(), locality)))
            }
        }
        _ => Err(AppError::bad_request(
            "une adresse est requise pour une livraison",
        )),
    }
}

pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn full_name(client: &clients::Model) -> String {
    format!("{} {}", client.first_name, client.last_name)
}

/// Load the client and line items that go with an order.
pub(crate) async fn load_order_with_items<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
) -> AppResult<OrderWithItems> {
    let client = Clients::find_by_id(order.client_id).one(db).await?;
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .all(db)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(OrderWithItems {
        order: order.into(),
        client: client.map(Into::into),
        items,
    })
}

/// Recompute `total_amount` from the current line items.
pub(crate) async fn recompute_total<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
) -> AppResult<orders::Model> {
    let total = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(db)
        .await?
        .iter()
        .try_fold(0i64, |total, item| {
            item.line_total()
                .and_then(|line| total.checked_add(line))
                .ok_or_else(amount_too_large)
        })?;

    let mut active: OrderActive = order.into();
    active.total_amount = Set(total);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(db).await?)
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(client_id) = query.client_id {
        condition = condition.add(OrderCol::ClientId.eq(client_id));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .find_also_related(Clients)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(order, client)| OrderSummary {
            order: order.into(),
            client_name: client.as_ref().map(full_name).unwrap_or_default(),
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Commandes", OrderList { items }, Some(meta)))
}

/// Order history of the signed-in client, newest first.
pub async fn list_client_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderHistory>> {
    let (page, limit, offset) = pagination.normalize();
    let client = resolve_client(&state.orm, &ClientRef::AuthId(user.subject.clone())).await?;

    let finder = Orders::find()
        .filter(OrderCol::ClientId.eq(client.id))
        .order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    if !ids.is_empty() {
        let rows = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(ids))
            .order_by_asc(OrderItemCol::Id)
            .all(&state.orm)
            .await?;
        for row in rows {
            items_by_order.entry(row.order_id).or_default().push(row.into());
        }
    }

    let items = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems {
                order: order.into(),
                client: None,
                items,
            }
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Historique", OrderHistory { items }, Some(meta)))
}

/// Order tracking for the signed-in client. Orders of other clients are
/// reported as missing.
pub async fn get_client_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let client = resolve_client(&state.orm, &ClientRef::AuthId(user.subject.clone())).await?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::ClientId.eq(client.id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = load_order_with_items(&state.orm, order).await?;
    Ok(ApiResponse::ok("Commande", data))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = load_order_with_items(&state.orm, order).await?;
    Ok(ApiResponse::ok("Commande", data))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let (order, previous_status) = update_order_inner(state, id, payload)
        .await
        .map_err(|e| e.context("Impossible de mettre à jour la commande"))?;

    if order.status != previous_status {
        tracing::info!(
            order_id = order.id,
            from = previous_status.as_db(),
            to = order.status.as_db(),
            "order status changed"
        );
        notify_status_change(state, &order).await;
    }

    audit::record(
        &state.pool,
        Some(&user.subject),
        "order_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status.as_db() }),
    )
    .await;
    state.notifier.revalidate(ORDER_PATHS).await;

    let data = load_order_with_items(&state.orm, order).await?;
    Ok(ApiResponse::ok("Commande mise à jour", data))
}

async fn update_order_inner(
    state: &AppState,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<(orders::Model, OrderStatus)> {
    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous_status = existing.status;

    if let Some(next) = payload.status {
        if !previous_status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "la commande est déjà « {} »",
                previous_status.label()
            )));
        }
    }

    let delivery_type = payload.delivery_type.unwrap_or(existing.delivery_type);
    let delivery_address = if payload.delivery_address.is_some() {
        clean_text(payload.delivery_address)
    } else {
        existing.delivery_address.clone()
    };
    let delivery_address = if delivery_type == DeliveryType::Delivery && delivery_address.is_none() {
        let client = resolve_client(&txn, &ClientRef::Id(existing.client_id)).await?;
        resolve_delivery_address(delivery_type, None, &client)?
    } else {
        delivery_address
    };

    let mut active: OrderActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(pickup_at) = payload.pickup_at {
        active.pickup_at = Set(Some(pickup_at.into()));
    }
    if payload.notes.is_some() {
        active.notes = Set(clean_text(payload.notes));
    }
    active.delivery_type = Set(delivery_type);
    active.delivery_address = Set(delivery_address);
    active.updated_at = Set(Utc::now().into());

    let order = active.update(&txn).await?;
    txn.commit().await?;
    Ok((order, previous_status))
}

async fn notify_status_change(state: &AppState, order: &orders::Model) {
    let client = match Clients::find_by_id(order.client_id).one(&state.orm).await {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(order_id = order.id, error = %err, "could not load client for notification");
            return;
        }
    };

    match client.and_then(|c| c.auth_user_id) {
        Some(auth_id) => {
            state
                .notifier
                .order_status_changed(StatusNotification::new(auth_id, order.id, order.status))
                .await;
        }
        None => {
            tracing::debug!(order_id = order.id, "client has no app account, no push sent");
        }
    }
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Orders::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::from(e).context("Impossible de supprimer la commande"))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id = id, "order deleted");
    audit::record(
        &state.pool,
        Some(&user.subject),
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;
    state.notifier.revalidate(ORDER_PATHS).await;

    Ok(ApiResponse::ok("Commande supprimée", serde_json::json!({})))
}
