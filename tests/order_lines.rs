use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use restaurant_orders_api::{
    dto::orders::{MAX_QUANTITY, OrderItemInput, ProductRef, merged_quantity},
    entity::{dishes, extras, order_items},
    error::AppError,
    routes::params::{Pagination, StatsQuery},
    services::{
        order_lines::{build_lines, lines_total, referenced_ids},
        stats_service::{average_basket, stats_window},
    },
};

fn dish(id: i32, name: &str, price: i64, available: bool) -> dishes::Model {
    let now = Utc::now().fixed_offset();
    dishes::Model {
        id,
        name: name.to_string(),
        description: None,
        price,
        category: Some("Plats".into()),
        photo_url: None,
        available,
        created_at: now,
        updated_at: now,
    }
}

fn extra(id: i32, name: &str, price: i64) -> extras::Model {
    let now = Utc::now().fixed_offset();
    extras::Model {
        id,
        name: name.to_string(),
        description: None,
        price,
        available: true,
        created_at: now,
        updated_at: now,
    }
}

fn menu() -> (HashMap<i32, dishes::Model>, HashMap<i32, extras::Model>) {
    let dishes = [
        dish(1, "Poulet yassa", 1350, true),
        dish(2, "Mafé", 1450, true),
        dish(3, "Plat du jour", 990, false),
    ]
    .into_iter()
    .map(|d| (d.id, d))
    .collect();
    let extras = [extra(10, "Alloco", 350)].into_iter().map(|e| (e.id, e)).collect();
    (dishes, extras)
}

#[test]
fn lines_copy_name_and_price_from_menu() {
    let (dishes, extras) = menu();
    let mut spicy = OrderItemInput::dish(1, 2);
    spicy.spice_level = Some(3);
    spicy.distribution = Some("  une part sans oignons  ".into());
    let items = vec![spicy, OrderItemInput::dish(2, 1), OrderItemInput::extra(10, 3)];

    let lines = build_lines(&items, &dishes, &extras).expect("lines");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].name, "Poulet yassa");
    assert_eq!(lines[0].unit_price, 1350);
    assert_eq!(lines[0].spice_level, Some(3));
    assert_eq!(lines[0].distribution.as_deref(), Some("une part sans oignons"));
    assert_eq!(lines[2].extra_id, Some(10));
    assert_eq!(lines[2].dish_id, None);
    assert_eq!(lines_total(&lines).expect("total"), 1350 * 2 + 1450 + 350 * 3);
}

#[test]
fn empty_basket_is_rejected() {
    let err = referenced_ids(&[]).expect_err("empty basket");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn referenced_ids_are_deduplicated() {
    let items = vec![
        OrderItemInput::dish(2, 1),
        OrderItemInput::dish(1, 1),
        OrderItemInput::dish(2, 4),
        OrderItemInput::extra(10, 1),
    ];
    let (dish_ids, extra_ids) = referenced_ids(&items).expect("ids");
    assert_eq!(dish_ids, vec![1, 2]);
    assert_eq!(extra_ids, vec![10]);
}

#[test]
fn unknown_or_unavailable_dish_fails_the_whole_basket() {
    let (dishes, extras) = menu();

    let unknown = vec![OrderItemInput::dish(1, 1), OrderItemInput::dish(42, 1)];
    let err = build_lines(&unknown, &dishes, &extras).expect_err("unknown dish");
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("42")));

    let unavailable = vec![OrderItemInput::dish(3, 1)];
    let err = build_lines(&unavailable, &dishes, &extras).expect_err("unavailable dish");
    assert!(matches!(err, AppError::BadRequest(_)));

    let unknown_extra = vec![OrderItemInput::extra(11, 1)];
    assert!(build_lines(&unknown_extra, &dishes, &extras).is_err());
}

#[test]
fn item_inputs_are_validated() {
    let both = OrderItemInput {
        dish_id: Some(1),
        extra_id: Some(10),
        quantity: 1,
        spice_level: None,
        distribution: None,
    };
    assert!(both.validate().is_err());

    let neither = OrderItemInput {
        dish_id: None,
        extra_id: None,
        ..both.clone()
    };
    assert!(neither.validate().is_err());

    assert!(OrderItemInput::dish(1, 0).validate().is_err());
    assert!(OrderItemInput::dish(1, -2).validate().is_err());
    assert_eq!(OrderItemInput::dish(1, 1).validate().ok(), Some(ProductRef::Dish(1)));

    let mut too_hot = OrderItemInput::dish(1, 1);
    too_hot.spice_level = Some(4);
    assert!(too_hot.validate().is_err());

    let mut spicy_extra = OrderItemInput::extra(10, 1);
    spicy_extra.spice_level = Some(1);
    assert!(spicy_extra.validate().is_err());

    let mut long_note = OrderItemInput::dish(1, 1);
    long_note.distribution = Some("x".repeat(256));
    assert!(long_note.validate().is_err());
}

#[test]
fn quantity_is_bounded() {
    assert!(OrderItemInput::dish(1, MAX_QUANTITY).validate().is_ok());
    assert!(OrderItemInput::dish(1, MAX_QUANTITY + 1).validate().is_err());
    assert!(OrderItemInput::extra(10, i32::MAX).validate().is_err());

    let (dishes, extras) = menu();
    let err = referenced_ids(&[OrderItemInput::dish(1, i32::MAX)]).expect_err("huge quantity");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(build_lines(&[OrderItemInput::dish(1, i32::MAX)], &dishes, &extras).is_err());
}

#[test]
fn merged_quantity_stays_within_bounds() {
    assert_eq!(merged_quantity(3, 2).ok(), Some(5));
    assert_eq!(merged_quantity(MAX_QUANTITY - 1, 1).ok(), Some(MAX_QUANTITY));
    assert!(matches!(
        merged_quantity(MAX_QUANTITY, 1),
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        merged_quantity(i32::MAX, 1),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn overflowing_amounts_are_rejected() {
    let dishes: HashMap<i32, dishes::Model> = [dish(1, "Méchoui", i64::MAX / 2, true)]
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
    let extras = HashMap::new();

    let lines = build_lines(&[OrderItemInput::dish(1, 3)], &dishes, &extras).expect("lines");
    assert!(matches!(lines[0].total(), Err(AppError::BadRequest(_))));
    assert!(matches!(lines_total(&lines), Err(AppError::BadRequest(_))));

    // Each line fits, their sum does not.
    let pair = vec![OrderItemInput::dish(1, 1), OrderItemInput::dish(1, 2)];
    let lines = build_lines(&pair, &dishes, &extras).expect("lines");
    assert!(lines.iter().all(|line| line.total().is_ok()));
    assert!(lines_total(&lines).is_err());
}

#[test]
fn stored_line_total_is_checked() {
    let now = Utc::now().fixed_offset();
    let line = order_items::Model {
        id: 1,
        order_id: 1,
        dish_id: Some(1),
        extra_id: None,
        name: "Méchoui".into(),
        unit_price: i64::MAX / 2,
        quantity: 3,
        spice_level: None,
        distribution: None,
        is_pinned: false,
        is_offered: false,
        created_at: now,
    };
    assert_eq!(line.line_total(), None);

    let offered = order_items::Model {
        is_offered: true,
        ..line.clone()
    };
    assert_eq!(offered.line_total(), Some(0));

    let regular = order_items::Model {
        unit_price: 1350,
        ..line
    };
    assert_eq!(regular.line_total(), Some(4050));
}

#[test]
fn item_input_defaults_quantity_to_one() {
    let item: OrderItemInput = serde_json::from_str(r#"{ "dish_id": 5 }"#).expect("json");
    assert_eq!(item.quantity, 1);
    assert_eq!(item.validate().ok(), Some(ProductRef::Dish(5)));
}

#[test]
fn pagination_is_clamped() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    assert_eq!(Pagination::new(3, 10).normalize(), (3, 10, 20));
    assert_eq!(Pagination::new(0, 500).normalize(), (1, 100, 0));
    assert_eq!(Pagination::new(-4, 0).normalize(), (1, 1, 0));
    assert_eq!(
        Pagination::new(i64::MAX, 100).normalize(),
        (1_000_000, 100, 99_999_900)
    );
    assert_eq!(Pagination::new(i64::MIN, 100).normalize(), (1, 100, 0));
}

#[test]
fn stats_window_defaults_to_last_thirty_days() {
    let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
    let (from, to) = stats_window(&StatsQuery::default(), now).expect("window");
    assert_eq!(to, now);
    assert_eq!(from, now - Duration::days(30));

    let reversed = StatsQuery {
        from: Some(now),
        to: Some(now - Duration::days(1)),
    };
    assert!(stats_window(&reversed, now).is_err());
}

#[test]
fn average_basket_handles_no_orders() {
    assert_eq!(average_basket(0, 0), 0);
    assert_eq!(average_basket(4500, 3), 1500);
}
