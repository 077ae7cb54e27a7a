use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::report;
use crate::utils::time;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// 1-based calendar month
    #[param(example = 3)]
    pub month: Option<u32>,
    #[param(example = 2024)]
    pub year: Option<i32>,
}

impl MonthQuery {
    /// Reject a missing or malformed window before touching the database.
    pub(crate) fn resolve(
        &self,
        config: &Config,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>, i32, u32), ApiError> {
        let (month, year) = match (self.month, self.year) {
            (Some(m), Some(y)) => (m, y),
            _ => return Err(ApiError::InvalidWindow),
        };
        let (start, end) =
            time::month_window(year, month, config.reporting_tz()).ok_or(ApiError::InvalidWindow)?;
        Ok((start, end, year, month))
    }
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct RecentCheckin {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@email.com")]
    pub email: String,
    #[schema(format = "date-time", value_type = String)]
    pub check_in: DateTime<Utc>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: i64,
    pub present_today: i64,
    pub checked_in_today: i64,
    pub checked_out_today: i64,
    pub recent_checkins: Vec<RecentCheckin>,
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: u64,
    name: String,
    date_of_joining: NaiveDate,
}

async fn count_today(
    pool: &MySqlPool,
    day: NaiveDate,
    status: Option<AttendanceStatus>,
) -> Result<i64, ApiError> {
    let mut sql = "SELECT COUNT(*) FROM attendance WHERE day = ?".to_string();
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }

    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(day);
    if let Some(s) = status {
        query = query.bind(s);
    }

    Ok(query.fetch_one(pool).await?)
}

pub(crate) async fn fetch_window(
    pool: &MySqlPool,
    user_id: u64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ascending: bool,
) -> Result<Vec<Attendance>, ApiError> {
    let order = if ascending { "ASC" } else { "DESC" };
    let sql = format!(
        r#"
        SELECT id, user_id, day, check_in, check_out, status, origin_lat, origin_long
        FROM attendance
        WHERE user_id = ? AND check_in >= ? AND check_in < ?
        ORDER BY check_in {order}
        "#
    );

    let records = sqlx::query_as::<_, Attendance>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(records)
}

/// Live attendance counters for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Today's aggregate stats", body = DashboardStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let day = time::civil_date(Utc::now(), config.reporting_tz());

    let total_employees =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'employee'")
            .fetch_one(pool.get_ref())
            .await
            .map_err(ApiError::from)?;

    let checked_in_today = count_today(pool.get_ref(), day, None).await?;
    let present_today = count_today(pool.get_ref(), day, Some(AttendanceStatus::Present)).await?;
    let checked_out_today =
        count_today(pool.get_ref(), day, Some(AttendanceStatus::CheckedOut)).await?;

    let recent_checkins = sqlx::query_as::<_, RecentCheckin>(
        r#"
        SELECT u.name, u.email, a.check_in, a.check_out, a.status
        FROM attendance a
        JOIN users u ON u.id = a.user_id
        WHERE a.day = ?
        ORDER BY a.check_in DESC
        LIMIT 10
        "#,
    )
    .bind(day)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_employees,
        present_today,
        checked_in_today,
        checked_out_today,
        recent_checkins,
    }))
}

/// Per-employee month summary for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard/employee-summary",
    params(MonthQuery),
    responses(
        (status = 200, description = "Summaries for every employee account", body = [report::EmployeeSummary]),
        (status = 400, description = "Month and year are required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn employee_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let (start, end, year, month) = query.resolve(&config)?;
    let tz = config.reporting_tz();
    let now = Utc::now();
    let working_days = time::working_days_until_today(year, month, time::civil_date(now, tz));

    let employees = sqlx::query_as::<_, EmployeeRow>(
        "SELECT id, name, date_of_joining FROM users WHERE role = 'employee'",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    let mut summaries = Vec::with_capacity(employees.len());
    for employee in employees {
        let records = fetch_window(pool.get_ref(), employee.id, start, end, true).await?;
        summaries.push(report::employee_summary(
            employee.id,
            employee.name,
            employee.date_of_joining,
            &records,
            working_days,
            now,
            tz,
        ));
    }

    Ok(HttpResponse::Ok().json(summaries))
}

/// Day-by-day attendance rows for one employee
#[utoipa::path(
    get,
    path = "/api/dashboard/employee-details/{id}",
    params(
        ("id", Path, description = "Employee user ID"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Attendance rows, newest first", body = [report::AttendanceDetail]),
        (status = 400, description = "Month and year are required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn employee_details(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    let (start, end, _, _) = query.resolve(&config)?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::from)?;
    if !exists {
        return Err(ApiError::NotFound("Employee not found").into());
    }

    let records = fetch_window(pool.get_ref(), user_id, start, end, false).await?;
    let rows = report::detail_rows(&records, config.reporting_tz());

    Ok(HttpResponse::Ok().json(rows))
}
