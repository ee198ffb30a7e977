//! Outbound side effects: customer push notifications and frontend cache
//! revalidation. Both are best-effort: failures are logged and never reach
//! the caller.

use std::time::Duration;

use serde::Serialize;

use crate::{config::AppConfig, status::OrderStatus, status::Vocabulary};

/// Pages showing order data.
pub const ORDER_PATHS: &[&str] = &[
    "/commander",
    "/suivi-commande",
    "/historique",
    "/admin/commandes",
    "/admin/statistiques",
];

pub const EVENT_PATHS: &[&str] = &["/evenements", "/admin/evenements"];

pub const CLIENT_PATHS: &[&str] = &["/admin/clients"];

pub const MENU_PATHS: &[&str] = &["/commander", "/admin/plats"];

#[derive(Debug, Serialize)]
pub struct StatusNotification {
    pub client_auth_id: String,
    pub order_id: i32,
    pub status: OrderStatus,
    pub title: String,
    pub body: String,
}

impl StatusNotification {
    pub fn new(client_auth_id: String, order_id: i32, status: OrderStatus) -> Self {
        let body = match status {
            OrderStatus::Pending => format!("Votre commande n°{order_id} a bien été reçue."),
            OrderStatus::Confirmed => format!("Votre commande n°{order_id} est confirmée."),
            OrderStatus::InPreparation => {
                format!("Votre commande n°{order_id} est en préparation.")
            }
            OrderStatus::Ready => format!("Votre commande n°{order_id} est prête !"),
            OrderStatus::PickedUp => format!("Merci ! Commande n°{order_id} récupérée."),
            OrderStatus::Cancelled => format!("Votre commande n°{order_id} a été annulée."),
        };
        Self {
            client_auth_id,
            order_id,
            status,
            title: format!("Commande {}", status.label()),
            body,
        }
    }
}

#[derive(Serialize)]
struct RevalidateRequest<'a> {
    paths: &'a [&'a str],
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    push_url: Option<String>,
    revalidate_url: Option<String>,
    revalidate_token: Option<String>,
}

impl Notifier {
    pub fn new(
        push_url: Option<String>,
        revalidate_url: Option<String>,
        revalidate_token: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            client,
            push_url,
            revalidate_url,
            revalidate_token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.push_notification_url.clone(),
            config.revalidate_url.clone(),
            config.revalidate_token.clone(),
        )
    }

    /// A notifier with no endpoints; every call is a no-op.
    pub fn disabled() -> Self {
        Self::new(None, None, None)
    }

    pub async fn order_status_changed(&self, notification: StatusNotification) {
        let Some(url) = self.push_url.as_deref() else {
            tracing::debug!(order_id = notification.order_id, "push endpoint not configured");
            return;
        };

        match self.client.post(url).json(&notification).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(
                    order_id = notification.order_id,
                    status = notification.status.as_db(),
                    "push notification sent"
                );
            }
            Ok(resp) => {
                tracing::warn!(
                    order_id = notification.order_id,
                    http_status = %resp.status(),
                    "push notification rejected"
                );
            }
            Err(err) => {
                tracing::warn!(order_id = notification.order_id, error = %err, "push notification failed");
            }
        }
    }

    pub async fn revalidate(&self, paths: &[&str]) {
        let Some(url) = self.revalidate_url.as_deref() else {
            return;
        };

        let mut request = self.client.post(url).json(&RevalidateRequest { paths });
        if let Some(token) = self.revalidate_token.as_deref() {
            request = request.header("x-revalidate-token", token);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(?paths, "pages revalidated");
            }
            Ok(resp) => {
                tracing::warn!(?paths, http_status = %resp.status(), "revalidation rejected");
            }
            Err(err) => {
                tracing::warn!(?paths, error = %err, "revalidation failed");
            }
        }
    }
}
