use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Per-day attendance state. `CheckedOut` is terminal; a day never re-enters
/// `Present`.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    CheckedOut,
}

/// One row per (user, civil day), created on check-in and mutated exactly
/// once on check-out. `day` is the civil date of `check_in` in the reporting
/// zone; the `(user_id, day)` unique key is what makes check-in atomic.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    pub day: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub origin_lat: Option<f64>,
    pub origin_long: Option<f64>,
}

impl Attendance {
    /// Check-out precondition against today's record.
    pub fn ensure_can_check_out(&self) -> Result<(), ApiError> {
        match self.status {
            AttendanceStatus::Present => Ok(()),
            AttendanceStatus::CheckedOut => Err(ApiError::AlreadyCheckedOut),
        }
    }

    /// Hours between check-in and check-out, `None` while the day is open.
    pub fn working_hours(&self) -> Option<f64> {
        let check_out = self.check_out?;
        Some((check_out - self.check_in).num_seconds() as f64 / 3600.0)
    }
}

/// Advisory line shown next to today's status.
pub fn status_message(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "You already checked in today",
        AttendanceStatus::CheckedOut => "You already checked out today",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AttendanceStatus, check_out: Option<&str>) -> Attendance {
        Attendance {
            id: 1,
            user_id: 7,
            day: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            check_in: "2024-03-04T03:45:00Z".parse().unwrap(), // 09:15 IST
            check_out: check_out.map(|s| s.parse().unwrap()),
            status,
            origin_lat: Some(12.9716),
            origin_long: Some(77.5946),
        }
    }

    #[test]
    fn present_record_may_check_out() {
        assert!(record(AttendanceStatus::Present, None).ensure_can_check_out().is_ok());
    }

    #[test]
    fn checked_out_is_terminal() {
        let rec = record(AttendanceStatus::CheckedOut, Some("2024-03-04T12:15:00Z"));
        assert!(matches!(rec.ensure_can_check_out(), Err(ApiError::AlreadyCheckedOut)));
    }

    #[test]
    fn working_hours_spans_check_in_to_check_out() {
        // 09:15 -> 17:45 IST is 8.5 hours.
        let rec = record(AttendanceStatus::CheckedOut, Some("2024-03-04T12:15:00Z"));
        assert_eq!(rec.working_hours(), Some(8.5));
    }

    #[test]
    fn open_day_has_no_working_hours() {
        assert_eq!(record(AttendanceStatus::Present, None).working_hours(), None);
    }
}
