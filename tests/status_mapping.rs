use restaurant_orders_api::status::{
    DeliveryType, EventStatus, EventType, OrderStatus, PaymentStatus, Vocabulary,
    map_delivery_type_to_db, map_delivery_type_to_ui, map_event_status_to_db,
    map_event_status_to_ui, map_event_type_to_db, map_event_type_to_ui, map_order_status_to_db,
    map_order_status_to_ui, map_payment_status_to_db, map_payment_status_to_ui,
};
use sea_orm::ActiveEnum;

fn assert_vocabulary<T>()
where
    T: Vocabulary + ActiveEnum<Value = String> + PartialEq + std::fmt::Debug + serde::Serialize,
{
    for value in T::ALL {
        // The sea-orm string_value and as_db must agree.
        assert_eq!(value.to_value(), value.as_db());
        assert_eq!(T::from_db(value.as_db()), Some(*value));
        assert_eq!(T::from_label(value.label()), Some(*value));

        let json = serde_json::to_value(value).expect("serialize");
        assert_eq!(json, serde_json::Value::String(value.label().to_string()));
    }
}

#[test]
fn every_vocabulary_matches_database_and_labels() {
    assert_vocabulary::<OrderStatus>();
    assert_vocabulary::<PaymentStatus>();
    assert_vocabulary::<DeliveryType>();
    assert_vocabulary::<EventStatus>();
    assert_vocabulary::<EventType>();
}

#[test]
fn order_status_round_trips_through_ui_labels() {
    let db_values = [
        "en_attente_confirmation",
        "confirmee",
        "en_preparation",
        "prete",
        "recuperee",
        "annulee",
    ];
    for value in db_values {
        let label = map_order_status_to_ui(value).expect("known status");
        assert_eq!(map_order_status_to_db(label), Some(value));
    }
    assert_eq!(OrderStatus::ALL.len(), 6);
    assert_eq!(map_order_status_to_ui("en_preparation"), Some("En préparation"));
    assert_eq!(map_order_status_to_db("Récupérée"), Some("recuperee"));
}

#[test]
fn other_vocabularies_round_trip() {
    assert_eq!(map_payment_status_to_ui("partiellement_payee"), Some("Partiellement payée"));
    assert_eq!(map_payment_status_to_db("Payée"), Some("payee"));
    assert_eq!(map_delivery_type_to_ui("a_emporter"), Some("À emporter"));
    assert_eq!(map_delivery_type_to_db("Sur place"), Some("sur_place"));
    assert_eq!(map_event_status_to_ui("devis_envoye"), Some("Devis envoyé"));
    assert_eq!(map_event_status_to_db("Réalisé"), Some("realise"));
    assert_eq!(map_event_type_to_ui("repas_entreprise"), Some("Repas d'entreprise"));
    assert_eq!(map_event_type_to_db("Fête de famille"), Some("fete_famille"));
}

#[test]
fn unknown_values_map_to_none() {
    assert_eq!(map_order_status_to_ui("livree"), None);
    assert_eq!(map_order_status_to_db("Livrée"), None);
    // Lookups are exact: the db value is not a label and accents matter.
    assert_eq!(map_order_status_to_db("confirmee"), None);
    assert_eq!(map_order_status_to_db("Confirmee"), None);
    assert_eq!(map_payment_status_to_ui(""), None);
    assert_eq!(map_delivery_type_to_db("Emporter"), None);
    assert_eq!(map_event_status_to_ui("DEMANDE_INITIALE"), None);
    assert_eq!(map_event_type_to_db("Séminaire"), None);
}

#[test]
fn labels_deserialize_and_db_values_do_not() {
    let status: OrderStatus = serde_json::from_str("\"En attente de confirmation\"").expect("label");
    assert_eq!(status, OrderStatus::Pending);
    assert!(serde_json::from_str::<OrderStatus>("\"en_attente_confirmation\"").is_err());
}

#[test]
fn closed_orders_cannot_change_status() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
    assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Pending));
    assert!(OrderStatus::InPreparation.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::PickedUp.can_transition_to(OrderStatus::PickedUp));

    for next in OrderStatus::ALL {
        if *next != OrderStatus::Cancelled {
            assert!(!OrderStatus::Cancelled.can_transition_to(*next));
        }
        if *next != OrderStatus::PickedUp {
            assert!(!OrderStatus::PickedUp.can_transition_to(*next));
        }
    }
}

#[test]
fn open_event_requests() {
    assert!(EventStatus::Requested.is_open());
    assert!(EventStatus::QuoteSent.is_open());
    assert!(!EventStatus::Confirmed.is_open());
    assert!(!EventStatus::Cancelled.is_open());
}
