use restaurant_orders_api::{
    notify::{Notifier, ORDER_PATHS, StatusNotification},
    status::OrderStatus,
};

#[test]
fn status_notification_is_written_for_the_customer() {
    let ready = StatusNotification::new("auth-1".into(), 17, OrderStatus::Ready);
    assert_eq!(ready.client_auth_id, "auth-1");
    assert!(ready.body.contains("17"));
    assert!(ready.body.contains("prête"));

    let json = serde_json::to_value(&ready).expect("json");
    assert_eq!(json["status"], "Prête");
    assert_eq!(json["order_id"], 17);
}

#[tokio::test]
async fn unreachable_endpoints_are_swallowed() {
    // Nothing listens on port 1; both calls must return without error.
    let notifier = Notifier::new(
        Some("http://127.0.0.1:1/push".into()),
        Some("http://127.0.0.1:1/revalidate".into()),
        Some("token".into()),
    );
    notifier
        .order_status_changed(StatusNotification::new("auth-1".into(), 1, OrderStatus::Cancelled))
        .await;
    notifier.revalidate(ORDER_PATHS).await;

    Notifier::disabled().revalidate(ORDER_PATHS).await;
}
