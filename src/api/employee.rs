use crate::api::dashboard::{MonthQuery, fetch_window};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::user::UserProfile;
use crate::report;
use crate::utils::time;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use sqlx::MySqlPool;

/// Profile of the calling user
#[utoipa::path(
    get,
    path = "/api/employee/profile",
    responses(
        (status = 200, description = "Account profile", body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, name, email, role, date_of_joining
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("User not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Month report for the calling user
#[utoipa::path(
    get,
    path = "/api/employee/report",
    params(MonthQuery),
    responses(
        (status = 200, description = "Attendance report with chart series", body = report::EmployeeReport),
        (status = 400, description = "Month and year are required"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn employee_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> Result<impl Responder, ApiError> {
    let (start, end, year, month) = query.resolve(&config)?;
    let tz = config.reporting_tz();
    let working_days =
        time::working_days_until_today(year, month, time::civil_date(Utc::now(), tz));

    // Chart series must come back oldest first.
    let records = fetch_window(pool.get_ref(), auth.user_id, start, end, true).await?;
    let report = report::employee_report(&records, working_days, tz);

    Ok(HttpResponse::Ok().json(report))
}
