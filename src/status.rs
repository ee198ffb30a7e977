//! Status vocabularies.
//!
//! Every enum here is stored as a PostgreSQL enum using an ASCII,
//! accent-stripped value (`en_preparation`) and travels over the API as the
//! accented French label the back-office and customer pages display
//! (`En préparation`). `as_db` and the `string_value` attributes must stay in
//! sync; `tests/status_mapping.rs` checks it for every variant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Two-way lookup between the database value and the UI label of a closed
/// vocabulary.
pub trait Vocabulary: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_db(self) -> &'static str;

    fn label(self) -> &'static str;

    fn from_db(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_db() == value)
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "statut_commande")]
pub enum OrderStatus {
    #[sea_orm(string_value = "en_attente_confirmation")]
    #[serde(rename = "En attente de confirmation")]
    Pending,
    #[sea_orm(string_value = "confirmee")]
    #[serde(rename = "Confirmée")]
    Confirmed,
    #[sea_orm(string_value = "en_preparation")]
    #[serde(rename = "En préparation")]
    InPreparation,
    #[sea_orm(string_value = "prete")]
    #[serde(rename = "Prête")]
    Ready,
    #[sea_orm(string_value = "recuperee")]
    #[serde(rename = "Récupérée")]
    PickedUp,
    #[sea_orm(string_value = "annulee")]
    #[serde(rename = "Annulée")]
    Cancelled,
}

impl Vocabulary for OrderStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Confirmed,
        Self::InPreparation,
        Self::Ready,
        Self::PickedUp,
        Self::Cancelled,
    ];

    fn as_db(self) -> &'static str {
        match self {
            Self::Pending => "en_attente_confirmation",
            Self::Confirmed => "confirmee",
            Self::InPreparation => "en_preparation",
            Self::Ready => "prete",
            Self::PickedUp => "recuperee",
            Self::Cancelled => "annulee",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "En attente de confirmation",
            Self::Confirmed => "Confirmée",
            Self::InPreparation => "En préparation",
            Self::Ready => "Prête",
            Self::PickedUp => "Récupérée",
            Self::Cancelled => "Annulée",
        }
    }
}

impl OrderStatus {
    /// Picked-up and cancelled orders are closed: their status and line
    /// items are frozen.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::PickedUp | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == next || !self.is_terminal()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "statut_paiement")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "en_attente")]
    #[serde(rename = "En attente")]
    Pending,
    #[sea_orm(string_value = "partiellement_payee")]
    #[serde(rename = "Partiellement payée")]
    PartiallyPaid,
    #[sea_orm(string_value = "payee")]
    #[serde(rename = "Payée")]
    Paid,
    #[sea_orm(string_value = "remboursee")]
    #[serde(rename = "Remboursée")]
    Refunded,
}

impl Vocabulary for PaymentStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::PartiallyPaid,
        Self::Paid,
        Self::Refunded,
    ];

    fn as_db(self) -> &'static str {
        match self {
            Self::Pending => "en_attente",
            Self::PartiallyPaid => "partiellement_payee",
            Self::Paid => "payee",
            Self::Refunded => "remboursee",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::PartiallyPaid => "Partiellement payée",
            Self::Paid => "Payée",
            Self::Refunded => "Remboursée",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "type_livraison")]
pub enum DeliveryType {
    #[sea_orm(string_value = "a_emporter")]
    #[serde(rename = "À emporter")]
    Takeaway,
    #[sea_orm(string_value = "livraison")]
    #[serde(rename = "Livraison")]
    Delivery,
    #[sea_orm(string_value = "sur_place")]
    #[serde(rename = "Sur place")]
    DineIn,
}

impl Vocabulary for DeliveryType {
    const ALL: &'static [Self] = &[Self::Takeaway, Self::Delivery, Self::DineIn];

    fn as_db(self) -> &'static str {
        match self {
            Self::Takeaway => "a_emporter",
            Self::Delivery => "livraison",
            Self::DineIn => "sur_place",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Takeaway => "À emporter",
            Self::Delivery => "Livraison",
            Self::DineIn => "Sur place",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "statut_evenement")]
pub enum EventStatus {
    #[sea_orm(string_value = "demande_initiale")]
    #[serde(rename = "Demande initiale")]
    Requested,
    #[sea_orm(string_value = "devis_envoye")]
    #[serde(rename = "Devis envoyé")]
    QuoteSent,
    #[sea_orm(string_value = "confirme")]
    #[serde(rename = "Confirmé")]
    Confirmed,
    #[sea_orm(string_value = "en_preparation")]
    #[serde(rename = "En préparation")]
    InPreparation,
    #[sea_orm(string_value = "realise")]
    #[serde(rename = "Réalisé")]
    Done,
    #[sea_orm(string_value = "annule")]
    #[serde(rename = "Annulé")]
    Cancelled,
}

impl Vocabulary for EventStatus {
    const ALL: &'static [Self] = &[
        Self::Requested,
        Self::QuoteSent,
        Self::Confirmed,
        Self::InPreparation,
        Self::Done,
        Self::Cancelled,
    ];

    fn as_db(self) -> &'static str {
        match self {
            Self::Requested => "demande_initiale",
            Self::QuoteSent => "devis_envoye",
            Self::Confirmed => "confirme",
            Self::InPreparation => "en_preparation",
            Self::Done => "realise",
            Self::Cancelled => "annule",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Requested => "Demande initiale",
            Self::QuoteSent => "Devis envoyé",
            Self::Confirmed => "Confirmé",
            Self::InPreparation => "En préparation",
            Self::Done => "Réalisé",
            Self::Cancelled => "Annulé",
        }
    }
}

impl EventStatus {
    /// Requests still waiting for staff follow-up.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Requested | Self::QuoteSent)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "type_evenement")]
pub enum EventType {
    #[sea_orm(string_value = "anniversaire")]
    #[serde(rename = "Anniversaire")]
    Birthday,
    #[sea_orm(string_value = "mariage")]
    #[serde(rename = "Mariage")]
    Wedding,
    #[sea_orm(string_value = "repas_entreprise")]
    #[serde(rename = "Repas d'entreprise")]
    CorporateMeal,
    #[sea_orm(string_value = "fete_famille")]
    #[serde(rename = "Fête de famille")]
    FamilyParty,
    #[sea_orm(string_value = "cocktail")]
    #[serde(rename = "Cocktail")]
    Cocktail,
    #[sea_orm(string_value = "autre")]
    #[serde(rename = "Autre")]
    Other,
}

impl Vocabulary for EventType {
    const ALL: &'static [Self] = &[
        Self::Birthday,
        Self::Wedding,
        Self::CorporateMeal,
        Self::FamilyParty,
        Self::Cocktail,
        Self::Other,
    ];

    fn as_db(self) -> &'static str {
        match self {
            Self::Birthday => "anniversaire",
            Self::Wedding => "mariage",
            Self::CorporateMeal => "repas_entreprise",
            Self::FamilyParty => "fete_famille",
            Self::Cocktail => "cocktail",
            Self::Other => "autre",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Birthday => "Anniversaire",
            Self::Wedding => "Mariage",
            Self::CorporateMeal => "Repas d'entreprise",
            Self::FamilyParty => "Fête de famille",
            Self::Cocktail => "Cocktail",
            Self::Other => "Autre",
        }
    }
}

pub fn map_order_status_to_ui(value: &str) -> Option<&'static str> {
    OrderStatus::from_db(value).map(|s| s.label())
}

pub fn map_order_status_to_db(label: &str) -> Option<&'static str> {
    OrderStatus::from_label(label).map(|s| s.as_db())
}

pub fn map_payment_status_to_ui(value: &str) -> Option<&'static str> {
    PaymentStatus::from_db(value).map(|s| s.label())
}

pub fn map_payment_status_to_db(label: &str) -> Option<&'static str> {
    PaymentStatus::from_label(label).map(|s| s.as_db())
}

pub fn map_delivery_type_to_ui(value: &str) -> Option<&'static str> {
    DeliveryType::from_db(value).map(|t| t.label())
}

pub fn map_delivery_type_to_db(label: &str) -> Option<&'static str> {
    DeliveryType::from_label(label).map(|t| t.as_db())
}

pub fn map_event_status_to_ui(value: &str) -> Option<&'static str> {
    EventStatus::from_db(value).map(|s| s.label())
}

pub fn map_event_status_to_db(label: &str) -> Option<&'static str> {
    EventStatus::from_label(label).map(|s| s.as_db())
}

pub fn map_event_type_to_ui(value: &str) -> Option<&'static str> {
    EventType::from_db(value).map(|t| t.label())
}

pub fn map_event_type_to_db(label: &str) -> Option<&'static str> {
    EventType::from_label(label).map(|t| t.as_db())
}
