use crate::api::attendance::{CoordReq, TodayStatusResponse};
use crate::api::dashboard::{DashboardStats, MonthQuery, RecentCheckin};
use crate::api::subscription::SubscriptionReq;
use crate::auth::handlers::{LoginReq, RegisterReq};
use crate::model::attendance::AttendanceStatus;
use crate::model::role::Role;
use crate::model::user::UserProfile;
use crate::report::{AttendanceDetail, CheckInTrendPoint, DailyHours, EmployeeReport, EmployeeSummary};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Geofenced check-in/check-out with monthly attendance reporting.

### 🔹 Key Features
- **Attendance**
  - Geofenced daily check-in and check-out, today-status query
- **Dashboard**
  - Live counters and per-employee month summaries for admins
- **Reports**
  - Self-service month report with working hours and check-in trend
- **Notifications**
  - Push notification fan-out on every check-in/check-out

### 🔐 Security
Protected endpoints use **JWT Bearer authentication**. Dashboard endpoints
require the **admin** role.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_status,

        crate::api::dashboard::dashboard,
        crate::api::dashboard::employee_summary,
        crate::api::dashboard::employee_details,

        crate::api::employee::profile,
        crate::api::employee::employee_report,

        crate::api::subscription::subscribe,
        crate::api::subscription::unsubscribe,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            CoordReq,
            TodayStatusResponse,
            AttendanceStatus,
            Role,
            UserProfile,
            DashboardStats,
            RecentCheckin,
            MonthQuery,
            EmployeeSummary,
            EmployeeReport,
            DailyHours,
            CheckInTrendPoint,
            AttendanceDetail,
            SubscriptionReq
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Attendance", description = "Check-in/check-out APIs"),
        (name = "Dashboard", description = "Admin dashboard APIs"),
        (name = "Employee", description = "Employee self-service APIs"),
        (name = "Notifications", description = "Push subscription APIs"),
    )
)]
pub struct ApiDoc;
