//! Push-notification fan-out.
//!
//! Deliveries run after the attendance row is committed and never feed back
//! into the triggering request: one slow or dead subscriber must not delay
//! the check-in response or starve the other subscribers. Endpoints that
//! answer 404/410 are pruned from the subscriber set.

use crate::model::subscription::PushSubscription;
use futures::future::join_all;
use reqwest::StatusCode;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    pub fn check_in(name: &str, time: &str) -> Self {
        Self {
            title: "New Attendance Check-in".to_string(),
            body: format!("{name} checked in at {time}"),
        }
    }

    pub fn check_out(name: &str, time: &str) -> Self {
        Self {
            title: "Attendance Check-out".to_string(),
            body: format!("{name} checked out at {time}"),
        }
    }
}

enum DeliveryFailure {
    /// Endpoint is permanently dead; prune the subscription.
    Gone,
    Other(String),
}

async fn deliver(
    client: &reqwest::Client,
    endpoint: &str,
    payload: &NotificationPayload,
) -> Result<(), DeliveryFailure> {
    let response = client
        .post(endpoint)
        .json(payload)
        .send()
        .await
        .map_err(|e| DeliveryFailure::Other(e.to_string()))?;

    match response.status() {
        s if s.is_success() => Ok(()),
        StatusCode::GONE | StatusCode::NOT_FOUND => Err(DeliveryFailure::Gone),
        s => Err(DeliveryFailure::Other(format!("endpoint answered {s}"))),
    }
}

/// Deliver `payload` to every registered subscriber, concurrently. Failures
/// are logged (and gone endpoints pruned) per subscriber; nothing aborts the
/// rest of the fan-out.
pub async fn broadcast(pool: &MySqlPool, client: &reqwest::Client, payload: NotificationPayload) {
    let subscriptions: Vec<PushSubscription> = match sqlx::query_as(
        "SELECT id, user_id, endpoint, created_at FROM push_subscriptions",
    )
    .fetch_all(pool)
    .await
    {
        Ok(subs) => subs,
        Err(e) => {
            error!(error = %e, "Failed to load push subscriptions");
            return;
        }
    };

    debug!(subscribers = subscriptions.len(), title = %payload.title, "Broadcasting notification");

    let deliveries = subscriptions.iter().map(|sub| {
        let payload = &payload;
        async move {
            match deliver(client, &sub.endpoint, payload).await {
                Ok(()) => {}
                Err(DeliveryFailure::Gone) => {
                    info!(subscription_id = sub.id, "Subscriber gone, pruning");
                    if let Err(e) = sqlx::query("DELETE FROM push_subscriptions WHERE id = ?")
                        .bind(sub.id)
                        .execute(pool)
                        .await
                    {
                        error!(error = %e, subscription_id = sub.id, "Failed to prune subscription");
                    }
                }
                Err(DeliveryFailure::Other(reason)) => {
                    error!(subscription_id = sub.id, %reason, "Notification delivery failed");
                }
            }
        }
    });

    join_all(deliveries).await;
}

/// Fire-and-forget broadcast from a request handler.
pub fn spawn_broadcast(pool: MySqlPool, client: reqwest::Client, payload: NotificationPayload) {
    actix_web::rt::spawn(async move {
        broadcast(&pool, &client, payload).await;
    });
}
