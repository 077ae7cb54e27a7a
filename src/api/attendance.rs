use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus, status_message};
use crate::notify::{NotificationPayload, spawn_broadcast};
use crate::utils::{geo, time};
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CoordReq {
    #[schema(example = 12.9716)]
    pub latitude: Option<f64>,
    #[schema(example = 77.5946)]
    pub longitude: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct TodayStatusResponse {
    #[schema(example = "present", value_type = Option<String>)]
    pub status: Option<AttendanceStatus>,
    #[schema(example = "You already checked in today")]
    pub message: Option<&'static str>,
}

fn ensure_within_office(coord: &CoordReq, config: &Config) -> Result<(), ApiError> {
    if geo::within_office(
        coord.latitude,
        coord.longitude,
        config.office_latitude,
        config.office_longitude,
        config.geofence_radius_m,
    ) {
        Ok(())
    } else {
        Err(ApiError::OutOfRange)
    }
}

async fn fetch_today(
    pool: &MySqlPool,
    user_id: u64,
    day: chrono::NaiveDate,
) -> Result<Option<Attendance>, ApiError> {
    let record = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, user_id, day, check_in, check_out, status, origin_lat, origin_long
        FROM attendance
        WHERE user_id = ? AND day = ?
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Display name for notification bodies; falls back to the account email.
async fn display_name(pool: &MySqlPool, auth: &AuthUser) -> String {
    sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = ?")
        .bind(auth.user_id)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| auth.email.clone())
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/checkin",
    request_body = CoordReq,
    responses(
        (status = 201, description = "Check-in successful", body = Object, example = json!({
            "message": "Check-in successful"
        })),
        (status = 400, description = "Already checked in today"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not within office"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    client: web::Data<reqwest::Client>,
    payload: web::Json<CoordReq>,
) -> Result<impl Responder, ApiError> {
    ensure_within_office(&payload, &config)?;

    let tz = config.reporting_tz();
    let now = Utc::now();
    let day = time::civil_date(now, tz);

    // The (user_id, day) unique key is the arbiter of "one check-in per
    // civil day": concurrent attempts race on the insert, not on a
    // read-then-write.
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, day, check_in, status, origin_lat, origin_long)
        VALUES (?, ?, ?, 'present', ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(day)
    .bind(now)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            let name = display_name(pool.get_ref(), &auth).await;
            spawn_broadcast(
                pool.get_ref().clone(),
                client.get_ref().clone(),
                NotificationPayload::check_in(&name, &time::format_time(now, tz)),
            );

            Ok(HttpResponse::Created().json(json!({ "message": "Check-in successful" })))
        }
        Err(e) => {
            // Duplicate (user_id, day) key
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(ApiError::AlreadyCheckedIn);
                }
            }

            error!(error = %e, user_id = auth.user_id, "Check-in failed");
            Err(e.into())
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CoordReq,
    responses(
        (status = 200, description = "Check-out successful", body = Object, example = json!({
            "message": "Check-out successful"
        })),
        (status = 400, description = "No active check-in found for today / already checked out"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not within office"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    client: web::Data<reqwest::Client>,
    payload: web::Json<CoordReq>,
) -> Result<impl Responder, ApiError> {
    ensure_within_office(&payload, &config)?;

    let tz = config.reporting_tz();
    let now = Utc::now();
    let day = time::civil_date(now, tz);

    let record = fetch_today(pool.get_ref(), auth.user_id, day)
        .await?
        .ok_or(ApiError::NoActiveCheckIn)?;
    record.ensure_can_check_out()?;

    // Status guard in the update keeps a racing second checkout from
    // overwriting the recorded time.
    let updated = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?, status = 'checked-out'
        WHERE id = ? AND status = 'present'
        "#,
    )
    .bind(now)
    .bind(record.id)
    .execute(pool.get_ref())
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::AlreadyCheckedOut);
    }

    let name = display_name(pool.get_ref(), &auth).await;
    spawn_broadcast(
        pool.get_ref().clone(),
        client.get_ref().clone(),
        NotificationPayload::check_out(&name, &time::format_time(now, tz)),
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Check-out successful" })))
}

/// Today's attendance status for the calling user
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's status", body = TodayStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    // Same day-boundary computation as the write paths, so reads never
    // drift from what check-in/check-out enforced.
    let day = time::civil_date(Utc::now(), config.reporting_tz());

    let record = fetch_today(pool.get_ref(), auth.user_id, day).await?;

    let response = match record {
        Some(rec) => TodayStatusResponse {
            status: Some(rec.status),
            message: Some(status_message(rec.status)),
        },
        None => TodayStatusResponse {
            status: None,
            message: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
