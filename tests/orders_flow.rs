use chrono::{Duration, Utc};
use restaurant_orders_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        clients::SyncClientRequest,
        events::{CreateEventRequest, UpdateEventRequest},
        menu::{CreateDishRequest, CreateExtraRequest, UpdateDishRequest},
        orders::{CreateOrderRequest, MAX_QUANTITY, OrderItemInput, UpdateOrderRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{Client, Dish, Extra},
    notify::Notifier,
    routes::params::{Pagination, StatsQuery},
    services::{
        client_service, event_service, menu_service, order_item_service,
        order_service::{self, ClientRef},
        stats_service,
    },
    state::AppState,
    status::{DeliveryType, EventStatus, EventType, OrderStatus, PaymentStatus},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use restaurant_orders_api::entity::{order_items, orders};

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        database_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        cors_allowed_origin: None,
        push_notification_url: None,
        revalidate_url: None,
        revalidate_token: None,
    };
    Ok(Some(AppState::new(pool, config)))
}

// Tests share one database and run concurrently: every fixture gets a
// unique name instead of truncating tables.
fn unique(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

fn profile() -> SyncClientRequest {
    SyncClientRequest {
        first_name: "Awa".into(),
        last_name: "Diop".into(),
        email: Some("Awa.Diop@Example.com".into()),
        phone: Some("0600000000".into()),
        address: Some("12 rue des Lilas".into()),
        postal_code: Some("69001".into()),
        city: Some("Lyon".into()),
    }
}

async fn register_client(state: &AppState, user: &AuthUser) -> anyhow::Result<Client> {
    let resp = client_service::sync_current_client(state, user, profile()).await?;
    Ok(resp.data.expect("client"))
}

/// Local push endpoint that counts the notifications it receives.
async fn push_counter() -> anyhow::Result<(String, Arc<AtomicUsize>)> {
    let received = Arc::new(AtomicUsize::new(0));
    let counter = received.clone();
    let app = axum::Router::new().route(
        "/push",
        axum::routing::post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                axum::http::StatusCode::OK
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/push"), received))
}

async fn create_dish(state: &AppState, admin: &AuthUser, price: i64) -> anyhow::Result<Dish> {
    let resp = menu_service::create_dish(
        state,
        admin,
        CreateDishRequest {
            name: unique("Yassa"),
            description: None,
            price,
            category: Some("Plats".into()),
            photo_url: None,
            available: None,
        },
    )
    .await?;
    Ok(resp.data.expect("dish"))
}

async fn create_extra(state: &AppState, admin: &AuthUser, price: i64) -> anyhow::Result<Extra> {
    let resp = menu_service::create_extra(
        state,
        admin,
        CreateExtraRequest {
            name: unique("Alloco"),
            description: None,
            price,
            available: None,
        },
    )
    .await?;
    Ok(resp.data.expect("extra"))
}

fn basket(items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        items,
        delivery_type: DeliveryType::Takeaway,
        pickup_at: None,
        delivery_address: None,
        notes: None,
    }
}

#[tokio::test]
async fn order_lines_snapshot_menu_prices() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));

    let client = register_client(&state, &customer).await?;
    assert_eq!(client.email.as_deref(), Some("awa.diop@example.com"));

    let yassa = create_dish(&state, &admin, 1350).await?;
    let mafe = create_dish(&state, &admin, 1450).await?;
    let alloco = create_extra(&state, &admin, 350).await?;

    let created = order_service::create_order(
        &state,
        &customer,
        ClientRef::AuthId(customer.subject.clone()),
        basket(vec![
            OrderItemInput::dish(yassa.id, 2),
            OrderItemInput::dish(mafe.id, 1),
            OrderItemInput::extra(alloco.id, 3),
        ]),
    )
    .await?
    .data
    .expect("order");

    assert_eq!(created.items.len(), 3);
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.client_id, client.id);
    assert_eq!(created.order.total_amount, 1350 * 2 + 1450 + 350 * 3);
    let yassa_line = created
        .items
        .iter()
        .find(|item| item.dish_id == Some(yassa.id))
        .expect("yassa line");
    assert_eq!(yassa_line.unit_price, yassa.price);
    assert_eq!(yassa_line.name, yassa.name);

    // Later price changes leave existing lines untouched.
    menu_service::update_dish(
        &state,
        &admin,
        yassa.id,
        UpdateDishRequest {
            price: Some(1800),
            ..Default::default()
        },
    )
    .await?;
    let tracked = order_service::get_client_order(&state, &customer, created.order.id)
        .await?
        .data
        .expect("order");
    let yassa_line = tracked
        .items
        .iter()
        .find(|item| item.dish_id == Some(yassa.id))
        .expect("yassa line");
    assert_eq!(yassa_line.unit_price, 1350);
    assert_eq!(tracked.order.total_amount, created.order.total_amount);

    let history = order_service::list_client_orders(&state, &customer, Pagination::new(1, 20))
        .await?
        .data
        .expect("history");
    assert_eq!(history.items.len(), 1);

    // A dish used by an order cannot be deleted.
    let err = menu_service::delete_dish(&state, &admin, yassa.id)
        .await
        .expect_err("dish in use");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn invalid_baskets_create_nothing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));
    let client = register_client(&state, &customer).await?;
    let dish = create_dish(&state, &admin, 1200).await?;

    let err = order_service::create_order(
        &state,
        &customer,
        ClientRef::Id(client.id),
        basket(vec![]),
    )
    .await
    .expect_err("empty basket");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::create_order(
        &state,
        &customer,
        ClientRef::Id(client.id),
        basket(vec![
            OrderItemInput::dish(dish.id, 1),
            OrderItemInput::dish(i32::MAX, 1),
        ]),
    )
    .await
    .expect_err("unknown dish");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::create_order(
        &state,
        &customer,
        ClientRef::AuthId(unique("nobody")),
        basket(vec![OrderItemInput::dish(dish.id, 1)]),
    )
    .await
    .expect_err("unknown client");
    assert!(matches!(err, AppError::BadRequest(_)));

    let order_count = orders::Entity::find()
        .filter(orders::Column::ClientId.eq(client.id))
        .count(&state.orm)
        .await?;
    assert_eq!(order_count, 0);
    let line_count = order_items::Entity::find()
        .filter(order_items::Column::DishId.eq(dish.id))
        .count(&state.orm)
        .await?;
    assert_eq!(line_count, 0);

    Ok(())
}

#[tokio::test]
async fn back_office_item_edits_keep_total_consistent() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));
    let client = register_client(&state, &customer).await?;
    let dish = create_dish(&state, &admin, 1000).await?;
    let extra = create_extra(&state, &admin, 300).await?;

    let order = order_service::create_order(
        &state,
        &admin,
        ClientRef::Id(client.id),
        CreateOrderRequest {
            delivery_type: DeliveryType::Delivery,
            ..basket(vec![OrderItemInput::dish(dish.id, 1)])
        },
    )
    .await?
    .data
    .expect("order");
    let order_id = order.order.id;
    assert_eq!(
        order.order.delivery_address.as_deref(),
        Some("12 rue des Lilas, 69001 Lyon")
    );

    // Same dish, same spice level: merged into the existing line.
    let after_add = order_item_service::add_item(&state, &admin, order_id, OrderItemInput::dish(dish.id, 2))
        .await?
        .data
        .expect("order");
    assert_eq!(after_add.items.len(), 1);
    assert_eq!(after_add.items[0].quantity, 3);
    assert_eq!(after_add.order.total_amount, 3000);

    let after_extra = order_item_service::add_item(&state, &admin, order_id, OrderItemInput::extra(extra.id, 2))
        .await?
        .data
        .expect("order");
    assert_eq!(after_extra.items.len(), 2);
    assert_eq!(after_extra.order.total_amount, 3600);
    let dish_line = after_extra.items.iter().find(|i| i.dish_id.is_some()).expect("dish line").id;
    let extra_line = after_extra.items.iter().find(|i| i.extra_id.is_some()).expect("extra line").id;

    let updated = order_item_service::update_quantity(&state, &admin, order_id, dish_line, 1)
        .await?
        .data
        .expect("order");
    assert_eq!(updated.order.total_amount, 1600);

    let err = order_item_service::update_quantity(&state, &admin, order_id, dish_line, 0)
        .await
        .expect_err("zero quantity");
    assert!(matches!(err, AppError::BadRequest(_)));

    let spiced = order_item_service::update_spice_level(&state, &admin, order_id, dish_line, Some(2))
        .await?
        .data
        .expect("order");
    assert_eq!(
        spiced.items.iter().find(|i| i.id == dish_line).and_then(|i| i.spice_level),
        Some(2)
    );
    let err = order_item_service::update_spice_level(&state, &admin, order_id, extra_line, Some(1))
        .await
        .expect_err("extras have no spice level");
    assert!(matches!(err, AppError::BadRequest(_)));

    let noted = order_item_service::update_distribution(
        &state,
        &admin,
        order_id,
        dish_line,
        Some("  à partager  ".into()),
    )
    .await?
    .data
    .expect("order");
    assert_eq!(
        noted.items.iter().find(|i| i.id == dish_line).and_then(|i| i.distribution.clone()),
        Some("à partager".into())
    );

    let pinned = order_item_service::toggle_pin(&state, &admin, order_id, dish_line)
        .await?
        .data
        .expect("order");
    assert!(pinned.items.iter().any(|i| i.id == dish_line && i.is_pinned));
    assert_eq!(pinned.order.total_amount, 1600);

    let offered = order_item_service::toggle_offered(&state, &admin, order_id, extra_line)
        .await?
        .data
        .expect("order");
    assert_eq!(offered.order.total_amount, 1000);
    let offered_line = offered.items.iter().find(|i| i.id == extra_line).expect("extra line");
    assert!(offered_line.is_offered);
    assert_eq!(offered_line.line_total, 0);

    let removed = order_item_service::remove_item(&state, &admin, order_id, extra_line)
        .await?
        .data
        .expect("order");
    assert_eq!(removed.items.len(), 1);
    assert_eq!(removed.order.total_amount, 1000);

    // Other spice level: a separate line.
    let plain = order_item_service::add_item(&state, &admin, order_id, OrderItemInput::dish(dish.id, 1))
        .await?
        .data
        .expect("order");
    assert_eq!(plain.items.len(), 2);
    assert_eq!(plain.order.total_amount, 2000);
    let plain_line = plain.items.iter().find(|i| i.id != dish_line).expect("plain line").id;

    // Same spice level and distribution: merged.
    let mut shared = OrderItemInput::dish(dish.id, 1);
    shared.spice_level = Some(2);
    shared.distribution = Some("à partager".into());
    let merged = order_item_service::add_item(&state, &admin, order_id, shared.clone())
        .await?
        .data
        .expect("order");
    assert_eq!(merged.items.len(), 2);
    assert_eq!(
        merged.items.iter().find(|i| i.id == dish_line).map(|i| i.quantity),
        Some(2)
    );
    assert_eq!(merged.order.total_amount, 3000);

    // Same spice level, other distribution: a separate line.
    let mut undivided = OrderItemInput::dish(dish.id, 1);
    undivided.spice_level = Some(2);
    let split = order_item_service::add_item(&state, &admin, order_id, undivided)
        .await?
        .data
        .expect("order");
    assert_eq!(split.items.len(), 3);
    assert_eq!(split.order.total_amount, 4000);

    // An offered line never absorbs new units.
    let gift = order_item_service::toggle_offered(&state, &admin, order_id, dish_line)
        .await?
        .data
        .expect("order");
    assert_eq!(gift.order.total_amount, 2000);
    let regift = order_item_service::add_item(&state, &admin, order_id, shared)
        .await?
        .data
        .expect("order");
    assert_eq!(regift.items.len(), 4);
    assert_eq!(regift.order.total_amount, 3000);
    assert_eq!(
        regift.items.iter().find(|i| i.id == dish_line).map(|i| i.quantity),
        Some(2)
    );

    // Merging past the quantity limit is refused and changes nothing.
    let full = order_item_service::update_quantity(&state, &admin, order_id, plain_line, MAX_QUANTITY)
        .await?
        .data
        .expect("order");
    assert_eq!(full.order.total_amount, 999_000 + 1000 + 1000);
    let err = order_item_service::add_item(&state, &admin, order_id, OrderItemInput::dish(dish.id, 1))
        .await
        .expect_err("quantity limit");
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = order_item_service::update_quantity(&state, &admin, order_id, plain_line, MAX_QUANTITY + 1)
        .await
        .expect_err("quantity limit");
    assert!(matches!(err, AppError::BadRequest(_)));
    let unchanged = order_service::get_order(&state, &admin, order_id)
        .await?
        .data
        .expect("order");
    assert_eq!(unchanged.order.total_amount, full.order.total_amount);
    assert_eq!(unchanged.items.len(), 4);

    // Customers cannot edit lines.
    let err = order_item_service::toggle_pin(&state, &customer, order_id, dish_line)
        .await
        .expect_err("customer");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn closed_orders_are_frozen() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));
    let client = register_client(&state, &customer).await?;
    let dish = create_dish(&state, &admin, 900).await?;

    let order = order_service::create_order(
        &state,
        &customer,
        ClientRef::Id(client.id),
        basket(vec![OrderItemInput::dish(dish.id, 1)]),
    )
    .await?
    .data
    .expect("order");
    let order_id = order.order.id;

    for status in [OrderStatus::Confirmed, OrderStatus::Ready, OrderStatus::PickedUp] {
        let updated = order_service::update_order(
            &state,
            &admin,
            order_id,
            UpdateOrderRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?
        .data
        .expect("order");
        assert_eq!(updated.order.status, status);
    }

    let err = order_service::update_order(
        &state,
        &admin,
        order_id,
        UpdateOrderRequest {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .expect_err("closed order");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = order_item_service::add_item(&state, &admin, order_id, OrderItemInput::dish(dish.id, 1))
        .await
        .expect_err("closed order");
    assert!(matches!(err, AppError::Conflict(_)));

    // Concurrent updates: a cancellation is never overwritten.
    let racing = order_service::create_order(
        &state,
        &customer,
        ClientRef::Id(client.id),
        basket(vec![OrderItemInput::dish(dish.id, 1)]),
    )
    .await?
    .data
    .expect("order");
    let racing_id = racing.order.id;
    let to_status = |status| UpdateOrderRequest {
        status: Some(status),
        ..Default::default()
    };
    order_service::update_order(&state, &admin, racing_id, to_status(OrderStatus::Ready)).await?;
    let (cancelled, confirmed) = tokio::join!(
        order_service::update_order(&state, &admin, racing_id, to_status(OrderStatus::Cancelled)),
        order_service::update_order(&state, &admin, racing_id, to_status(OrderStatus::Confirmed)),
    );
    cancelled?;
    if let Err(err) = confirmed {
        assert!(matches!(err, AppError::Conflict(_)));
    }
    let settled = order_service::get_order(&state, &admin, racing_id)
        .await?
        .data
        .expect("order");
    assert_eq!(settled.order.status, OrderStatus::Cancelled);

    order_service::delete_order(&state, &admin, order_id).await?;
    let err = order_service::get_order(&state, &admin, order_id)
        .await
        .expect_err("deleted");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn order_updates_keep_address_and_notify_on_status_change() -> anyhow::Result<()> {
    let Some(mut state) = setup_state().await? else {
        return Ok(());
    };
    let (push_url, pushes) = push_counter().await?;
    state.notifier = Notifier::new(Some(push_url), None, None);

    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));
    let client = register_client(&state, &customer).await?;
    let dish = create_dish(&state, &admin, 1100).await?;

    let order = order_service::create_order(
        &state,
        &customer,
        ClientRef::Id(client.id),
        basket(vec![OrderItemInput::dish(dish.id, 1)]),
    )
    .await?
    .data
    .expect("order");
    let order_id = order.order.id;
    assert_eq!(order.order.delivery_address, None);

    let noted = order_service::update_order(
        &state,
        &admin,
        order_id,
        UpdateOrderRequest {
            notes: Some("Sonner deux fois".into()),
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(noted.order.notes.as_deref(), Some("Sonner deux fois"));
    assert_eq!(noted.order.payment_status, PaymentStatus::Paid);
    assert_eq!(pushes.load(Ordering::SeqCst), 0);

    // Switching to delivery without an address uses the client's.
    let delivered = order_service::update_order(
        &state,
        &admin,
        order_id,
        UpdateOrderRequest {
            delivery_type: Some(DeliveryType::Delivery),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(delivered.order.delivery_type, DeliveryType::Delivery);
    assert_eq!(
        delivered.order.delivery_address.as_deref(),
        Some("12 rue des Lilas, 69001 Lyon")
    );

    // Blanking the address of a delivery order falls back the same way.
    let blanked = order_service::update_order(
        &state,
        &admin,
        order_id,
        UpdateOrderRequest {
            delivery_address: Some("   ".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(
        blanked.order.delivery_address.as_deref(),
        Some("12 rue des Lilas, 69001 Lyon")
    );

    for (status, expected) in [
        (OrderStatus::Confirmed, 1),
        (OrderStatus::Confirmed, 1),
        (OrderStatus::Ready, 2),
    ] {
        order_service::update_order(
            &state,
            &admin,
            order_id,
            UpdateOrderRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(pushes.load(Ordering::SeqCst), expected);
    }

    // A client without an address cannot get a delivery.
    let homeless = AuthUser::client(unique("auth"));
    let bare = client_service::sync_current_client(
        &state,
        &homeless,
        SyncClientRequest {
            address: None,
            postal_code: None,
            city: None,
            ..profile()
        },
    )
    .await?
    .data
    .expect("client");
    let takeaway = order_service::create_order(
        &state,
        &homeless,
        ClientRef::Id(bare.id),
        basket(vec![OrderItemInput::dish(dish.id, 1)]),
    )
    .await?
    .data
    .expect("order");
    let err = order_service::update_order(
        &state,
        &admin,
        takeaway.order.id,
        UpdateOrderRequest {
            delivery_type: Some(DeliveryType::Delivery),
            ..Default::default()
        },
    )
    .await
    .expect_err("no address");
    assert!(matches!(err, AppError::BadRequest(_)));
    let kept = order_service::get_order(&state, &admin, takeaway.order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(kept.order.delivery_type, DeliveryType::Takeaway);

    Ok(())
}

#[tokio::test]
async fn profile_sync_is_an_upsert() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = AuthUser::client(unique("auth"));

    let (first, second) = tokio::join!(
        client_service::sync_current_client(&state, &customer, profile()),
        client_service::sync_current_client(&state, &customer, profile()),
    );
    let first = first?.data.expect("client");
    let second = second?.data.expect("client");
    assert_eq!(first.id, second.id);

    let renamed = client_service::sync_current_client(
        &state,
        &customer,
        SyncClientRequest {
            first_name: "  Aminata ".into(),
            ..profile()
        },
    )
    .await?
    .data
    .expect("client");
    assert_eq!(renamed.id, first.id);
    assert_eq!(renamed.first_name, "Aminata");

    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let err = client_service::sync_current_client(&state, &admin, profile())
        .await
        .expect_err("staff");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn event_requests_and_dashboard() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = AuthUser::admin(Uuid::new_v4().to_string());
    let customer = AuthUser::client(unique("auth"));
    register_client(&state, &customer).await?;
    let dish = create_dish(&state, &admin, 1500).await?;

    let request = CreateEventRequest {
        event_type: EventType::Birthday,
        title: "Anniversaire de Fatou".into(),
        description: None,
        event_date: Utc::now() + Duration::days(30),
        guest_count: 40,
        budget: Some(120_000),
        location: Some("Salle des fêtes".into()),
        preselected_dish_ids: vec![dish.id, dish.id],
    };
    let event = event_service::create_event(&state, &customer, request.clone())
        .await?
        .data
        .expect("event");
    assert_eq!(event.status, EventStatus::Requested);
    assert_eq!(event.preselected_dish_ids, vec![dish.id]);

    let err = event_service::create_event(
        &state,
        &customer,
        CreateEventRequest {
            event_date: Utc::now() - Duration::days(1),
            ..request.clone()
        },
    )
    .await
    .expect_err("past date");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = event_service::create_event(
        &state,
        &customer,
        CreateEventRequest {
            preselected_dish_ids: vec![i32::MAX],
            ..request
        },
    )
    .await
    .expect_err("unknown dish");
    assert!(matches!(err, AppError::BadRequest(_)));

    let quoted = event_service::update_event(
        &state,
        &admin,
        event.id,
        UpdateEventRequest {
            status: Some(EventStatus::QuoteSent),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("event");
    assert_eq!(quoted.status, EventStatus::QuoteSent);

    let mine = event_service::list_client_events(&state, &customer, Pagination::default())
        .await?
        .data
        .expect("events");
    assert_eq!(mine.items.len(), 1);

    let stats = stats_service::dashboard_stats(&state, &admin, StatsQuery::default())
        .await?
        .data
        .expect("stats");
    assert_eq!(stats.orders_by_status.len(), 6);
    assert!(stats.open_event_requests >= 1);
    assert!(stats.client_count >= 1);

    let err = stats_service::dashboard_stats(&state, &customer, StatsQuery::default())
        .await
        .expect_err("customer");
    assert!(matches!(err, AppError::Forbidden));

    event_service::delete_event(&state, &admin, event.id).await?;
    Ok(())
}
