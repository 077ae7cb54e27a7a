//! Attendance aggregation over a month window.
//!
//! Everything here is a pure function over already-fetched rows; the
//! handlers own the SQL. All calendar math happens in the reporting zone so
//! a record written just after midnight IST lands on the right day.

use crate::model::attendance::Attendance;
use crate::utils::time::{civil_date, format_clock, format_date, format_time};
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Clock time shown when no qualifying records exist.
const NO_DATA: &str = "-";

/// Minutes past midnight for the 09:00 on-time cutoff.
const ON_TIME_CUTOFF_MIN: u32 = 9 * 60;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    pub total_present: i64,
    /// Working days minus present days; surfaced unclamped, so data
    /// anomalies show up as negative values instead of disappearing.
    pub total_absent: i64,
    #[schema(example = 152.25)]
    pub total_working_hours: f64,
    #[schema(example = "09:12")]
    pub avg_check_in_time: String,
    #[schema(example = "17:48")]
    pub avg_check_out_time: String,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date_of_joining: NaiveDate,
    pub days_since_joining: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyHours {
    #[schema(example = "04/03/2024")]
    pub date: String,
    pub hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInTrendPoint {
    #[schema(example = "04/03/2024")]
    pub date: String,
    #[schema(example = "09:15")]
    pub time: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReport {
    pub total_present: i64,
    pub total_absent: i64,
    pub total_working_hours: f64,
    /// Whole-percent share of check-ins at or before 09:00; 0 with no data.
    pub on_time_percentage: i64,
    pub daily_hours: Vec<DailyHours>,
    pub check_in_trend: Vec<CheckInTrendPoint>,
}

/// One row of the per-employee month detail table.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    #[schema(example = "04/03/2024")]
    pub date: String,
    #[schema(example = "09:15:00 AM")]
    pub check_in_time: String,
    #[schema(example = "05:45:00 PM")]
    pub check_out_time: String,
    #[schema(example = "8.50")]
    pub working_hours: String,
    #[schema(example = "checked-out")]
    pub status: String,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn total_working_hours(records: &[Attendance]) -> f64 {
    round2(records.iter().filter_map(Attendance::working_hours).sum())
}

/// Mean clock time of the given instants as "HH:MM" in the reporting zone,
/// or the `-` sentinel when nothing qualifies. Averaging happens on minutes
/// past local midnight, never on raw UTC timestamps.
fn average_clock_time<I>(times: I, tz: FixedOffset) -> String
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let minutes: Vec<u32> = times
        .into_iter()
        .map(|ts| {
            let local = ts.with_timezone(&tz);
            local.hour() * 60 + local.minute()
        })
        .collect();

    if minutes.is_empty() {
        return NO_DATA.to_string();
    }

    let mean = minutes.iter().sum::<u32>() / minutes.len() as u32;
    format!("{:02}:{:02}", mean / 60, mean % 60)
}

/// Present/absent/hours/average block shared by the admin summary and the
/// employee self-report.
fn summarize(
    records: &[Attendance],
    working_days: i64,
    tz: FixedOffset,
) -> (i64, i64, f64, String, String) {
    let total_present = records.len() as i64;
    let total_absent = working_days - total_present;
    let hours = total_working_hours(records);
    let avg_in = average_clock_time(records.iter().map(|r| r.check_in), tz);
    let avg_out = average_clock_time(records.iter().filter_map(|r| r.check_out), tz);
    (total_present, total_absent, hours, avg_in, avg_out)
}

pub fn employee_summary(
    id: u64,
    name: String,
    date_of_joining: NaiveDate,
    records: &[Attendance],
    working_days: i64,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> EmployeeSummary {
    let (total_present, total_absent, total_working_hours, avg_in, avg_out) =
        summarize(records, working_days, tz);

    EmployeeSummary {
        id,
        name,
        total_present,
        total_absent,
        total_working_hours,
        avg_check_in_time: avg_in,
        avg_check_out_time: avg_out,
        date_of_joining,
        days_since_joining: civil_date(now, tz)
            .signed_duration_since(date_of_joining)
            .num_days(),
    }
}

/// Self-service month report with charting series. `records` must be in
/// ascending check-in order; the series preserve that order.
pub fn employee_report(records: &[Attendance], working_days: i64, tz: FixedOffset) -> EmployeeReport {
    let (total_present, total_absent, total_working_hours, _, _) =
        summarize(records, working_days, tz);

    let on_time = records
        .iter()
        .filter(|r| {
            let local = r.check_in.with_timezone(&tz);
            local.hour() * 60 + local.minute() <= ON_TIME_CUTOFF_MIN
        })
        .count() as i64;
    let on_time_percentage = if total_present > 0 {
        (on_time as f64 / total_present as f64 * 100.0).round() as i64
    } else {
        0
    };

    let daily_hours = records
        .iter()
        .map(|r| DailyHours {
            date: format_date(r.check_in, tz),
            hours: r.working_hours().map(round2).unwrap_or(0.0),
        })
        .collect();

    let check_in_trend = records
        .iter()
        .map(|r| CheckInTrendPoint {
            date: format_date(r.check_in, tz),
            time: format_clock(r.check_in, tz),
        })
        .collect();

    EmployeeReport {
        total_present,
        total_absent,
        total_working_hours,
        on_time_percentage,
        daily_hours,
        check_in_trend,
    }
}

/// Per-day rows for the admin detail view. Open days render `-` in place of
/// check-out and hours rather than failing.
pub fn detail_rows(records: &[Attendance], tz: FixedOffset) -> Vec<AttendanceDetail> {
    records
        .iter()
        .map(|r| AttendanceDetail {
            date: format_date(r.check_in, tz),
            check_in_time: format_time(r.check_in, tz),
            check_out_time: r
                .check_out
                .map(|ts| format_time(ts, tz))
                .unwrap_or_else(|| NO_DATA.to_string()),
            working_hours: r
                .working_hours()
                .map(|h| format!("{:.2}", h))
                .unwrap_or_else(|| NO_DATA.to_string()),
            status: r.status.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    /// Record checked in/out at the given IST clock times on `day` of March 2024.
    fn rec(day: u32, check_in_ist: &str, check_out_ist: Option<&str>) -> Attendance {
        let tz = ist();
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let parse = |hm: &str| {
            let t: chrono::NaiveTime = format!("{hm}:00").parse().unwrap();
            chrono::TimeZone::from_local_datetime(&tz, &date.and_time(t))
                .unwrap()
                .with_timezone(&Utc)
        };
        let check_out = check_out_ist.map(parse);
        Attendance {
            id: day as u64,
            user_id: 7,
            day: date,
            check_in: parse(check_in_ist),
            check_out,
            status: if check_out.is_some() {
                AttendanceStatus::CheckedOut
            } else {
                AttendanceStatus::Present
            },
            origin_lat: None,
            origin_long: None,
        }
    }

    #[test]
    fn empty_month_yields_sentinel_summary() {
        let now: DateTime<Utc> = "2024-03-06T05:00:00Z".parse().unwrap();
        let summary = employee_summary(
            1,
            "Asha".into(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            &[],
            4,
            now,
            ist(),
        );
        assert_eq!(summary.total_present, 0);
        assert_eq!(summary.total_absent, 4);
        assert_eq!(summary.total_working_hours, 0.0);
        assert_eq!(summary.avg_check_in_time, "-");
        assert_eq!(summary.avg_check_out_time, "-");
        assert_eq!(summary.days_since_joining, 65); // Jan 1 -> Mar 6 IST
    }

    #[test]
    fn working_hours_total_is_rounded_to_two_places() {
        let records = vec![rec(4, "09:15", Some("17:45"))];
        let report = employee_report(&records, 21, ist());
        assert_eq!(report.total_working_hours, 8.5);
        assert_eq!(report.total_present, 1);
        assert_eq!(report.total_absent, 20);
    }

    #[test]
    fn absences_are_not_clamped_at_zero() {
        let records = vec![rec(2, "10:00", None)]; // a Saturday, 0 working days
        let report = employee_report(&records, 0, ist());
        assert_eq!(report.total_absent, -1);
    }

    #[test]
    fn average_clock_times_are_means_of_local_minutes() {
        let records = vec![rec(4, "09:00", Some("17:00")), rec(5, "10:00", Some("18:30"))];
        let summary = employee_summary(
            1,
            "Asha".into(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            &records,
            21,
            "2024-04-01T05:00:00Z".parse().unwrap(),
            ist(),
        );
        assert_eq!(summary.avg_check_in_time, "09:30");
        assert_eq!(summary.avg_check_out_time, "17:45");
    }

    #[test]
    fn on_time_cutoff_is_nine_sharp() {
        // 08:55 counts, 09:00 counts, 09:01 is late.
        let records = vec![
            rec(4, "08:55", Some("17:00")),
            rec(5, "09:00", Some("17:00")),
            rec(6, "09:01", Some("17:00")),
        ];
        let report = employee_report(&records, 21, ist());
        assert_eq!(report.on_time_percentage, 67);
    }

    #[test]
    fn chart_series_follow_record_order_with_open_days_as_zero() {
        let records = vec![rec(4, "09:15", Some("17:45")), rec(5, "09:30", None)];
        let report = employee_report(&records, 21, ist());
        assert_eq!(report.daily_hours.len(), 2);
        assert_eq!(report.daily_hours[0].date, "04/03/2024");
        assert_eq!(report.daily_hours[0].hours, 8.5);
        assert_eq!(report.daily_hours[1].hours, 0.0);
        assert_eq!(report.check_in_trend[1].time, "09:30");
    }

    #[test]
    fn detail_rows_render_open_days_with_sentinels() {
        let rows = detail_rows(&[rec(5, "09:30", None)], ist());
        assert_eq!(rows[0].check_in_time, "09:30:00 AM");
        assert_eq!(rows[0].check_out_time, "-");
        assert_eq!(rows[0].working_hours, "-");
        assert_eq!(rows[0].status, "present");
    }

    #[test]
    fn detail_rows_format_closed_days() {
        let rows = detail_rows(&[rec(4, "09:15", Some("17:45"))], ist());
        assert_eq!(rows[0].working_hours, "8.50");
        assert_eq!(rows[0].check_out_time, "05:45:00 PM");
        assert_eq!(rows[0].status, "checked-out");
    }
}
