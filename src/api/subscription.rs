use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SubscriptionReq {
    /// Push-service URL notifications are POSTed to.
    #[schema(example = "https://push.example.com/send/abc123")]
    pub endpoint: String,
}

/// Register a push-notification subscriber
#[utoipa::path(
    post,
    path = "/api/subscribe",
    request_body = SubscriptionReq,
    responses(
        (status = 201, description = "Subscribed", body = Object, example = json!({
            "message": "Subscribed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn subscribe(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubscriptionReq>,
) -> Result<impl Responder, ApiError> {
    let result = sqlx::query(
        "INSERT INTO push_subscriptions (user_id, endpoint) VALUES (?, ?)",
    )
    .bind(auth.user_id)
    .bind(&payload.endpoint)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!(user_id = auth.user_id, "Push subscriber registered");
            Ok(HttpResponse::Created().json(json!({ "message": "Subscribed" })))
        }
        Err(e) => {
            // Re-subscribing the same endpoint is a no-op, not an error.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Ok().json(json!({ "message": "Already subscribed" })));
                }
            }
            Err(e.into())
        }
    }
}

/// Remove a push-notification subscriber
#[utoipa::path(
    post,
    path = "/api/unsubscribe",
    request_body = SubscriptionReq,
    responses(
        (status = 200, description = "Unsubscribed", body = Object, example = json!({
            "message": "Unsubscribed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn unsubscribe(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubscriptionReq>,
) -> Result<impl Responder, ApiError> {
    sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = ?")
        .bind(&payload.endpoint)
        .execute(pool.get_ref())
        .await?;

    // Idempotent: succeeds whether or not the endpoint was registered.
    Ok(HttpResponse::Ok().json(json!({ "message": "Unsubscribed" })))
}
