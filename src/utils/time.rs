//! Civil-day arithmetic in the fixed reporting timezone.
//!
//! Every read and write path that cares about "today" goes through these
//! helpers with a `now` taken at request time. The day boundary moves at
//! midnight in the reporting zone, so none of this may be cached across
//! requests.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

/// Midnight of the current civil day as a UTC instant, the lower bound for
/// "today" queries.
pub fn start_of_civil_day(now: DateTime<Utc>, tz: FixedOffset) -> DateTime<Utc> {
    let local_midnight = now
        .with_timezone(&tz)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    // Fixed offsets have exactly one local->UTC mapping.
    tz.from_local_datetime(&local_midnight)
        .unwrap()
        .with_timezone(&Utc)
}

/// Calendar date of `ts` in the reporting zone.
pub fn civil_date(ts: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Half-open `[start, end)` UTC window covering one calendar month in the
/// reporting zone. `None` when month/year do not name a real month.
pub fn month_window(
    year: i32,
    month: u32,
    tz: FixedOffset,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let to_utc = |d: NaiveDate| {
        tz.from_local_datetime(&d.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    };

    Some((to_utc(first), to_utc(next_first)))
}

/// Mon-Fri days of the month, capped at `today` while the month is still in
/// progress so future days never count toward absence. A month entirely in
/// the future has zero working days; no holiday calendar is applied.
pub fn working_days_until_today(year: i32, month: u32, today: NaiveDate) -> i64 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    if today < first {
        return 0;
    }

    let days_in_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }
    .map(|next| next.signed_duration_since(first).num_days() as u32)
    .unwrap_or(0);

    let is_current = today.year() == year && today.month() == month;
    let last_day = if is_current { today.day() } else { days_in_month };

    (1..=last_day)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}

/// "hh:mm:ss AM/PM" in the reporting zone.
pub fn format_time(ts: DateTime<Utc>, tz: FixedOffset) -> String {
    ts.with_timezone(&tz).format("%I:%M:%S %p").to_string()
}

/// "dd/mm/yyyy" in the reporting zone.
pub fn format_date(ts: DateTime<Utc>, tz: FixedOffset) -> String {
    ts.with_timezone(&tz).format("%d/%m/%Y").to_string()
}

/// "HH:MM" in the reporting zone, for trend charts.
pub fn format_clock(ts: DateTime<Utc>, tz: FixedOffset) -> String {
    ts.with_timezone(&tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn day_boundary_follows_reporting_zone_not_utc() {
        // 20:00 UTC is already 01:30 next day in IST.
        let now = utc("2024-03-04T20:00:00Z");
        assert_eq!(civil_date(now, ist()), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(start_of_civil_day(now, ist()), utc("2024-03-04T18:30:00Z"));
    }

    #[test]
    fn day_boundary_mid_civil_day() {
        let now = utc("2024-03-04T10:00:00Z"); // 15:30 IST
        assert_eq!(civil_date(now, ist()), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(start_of_civil_day(now, ist()), utc("2024-03-03T18:30:00Z"));
    }

    #[test]
    fn month_window_is_zone_local_midnights() {
        let (start, end) = month_window(2024, 3, ist()).unwrap();
        assert_eq!(start, utc("2024-02-29T18:30:00Z"));
        assert_eq!(end, utc("2024-03-31T18:30:00Z"));
    }

    #[test]
    fn month_window_rejects_bad_month() {
        assert!(month_window(2024, 13, ist()).is_none());
        assert!(month_window(2024, 0, ist()).is_none());
    }

    #[test]
    fn working_days_full_past_month() {
        // March 2024: 21 weekdays.
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(working_days_until_today(2024, 3, today), 21);
    }

    #[test]
    fn working_days_capped_at_today_for_current_month() {
        // 2024-03-06 is a Wednesday; 1st is a Friday, 2nd/3rd a weekend.
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(working_days_until_today(2024, 3, today), 4);
    }

    #[test]
    fn working_days_future_month_is_zero() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(working_days_until_today(2024, 4, today), 0);
    }

    #[test]
    fn formats_render_in_reporting_zone() {
        let ts = utc("2024-03-04T03:45:00Z"); // 09:15 IST
        assert_eq!(format_time(ts, ist()), "09:15:00 AM");
        assert_eq!(format_date(ts, ist()), "04/03/2024");
        assert_eq!(format_clock(ts, ist()), "09:15");
    }
}
