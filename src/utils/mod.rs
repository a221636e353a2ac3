pub mod config;

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Ids are creation timestamps; bump past any id already taken.
pub fn fresh_id(now_ms: i64, taken: impl IntoIterator<Item = i64>) -> i64 {
    let taken: HashSet<i64> = taken.into_iter().collect();
    let mut id = now_ms;
    while taken.contains(&id) {
        id += 1;
    }
    id
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Local calendar day of `now` as `(YYYY-MM-DD, start_ms, end_ms)`, with the
/// end at 23:59:59.999 so the range is inclusive on both sides.
pub fn today_bounds_local(now: &DateTime<Local>) -> (String, i64, i64) {
    let date = now.date_naive();
    let start = date
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|last| Local.from_local_datetime(&last).latest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(start + DAY_MS - 1);
    (date_key(date), start, end)
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(now: &DateTime<Local>) -> u8 {
    now.weekday().num_days_from_sunday() as u8
}

pub fn local_from_ms(ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(ms).single()
}

pub fn is_valid_date_key(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn is_valid_time(value: &str) -> bool {
    value.len() == 5 && chrono::NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_id_skips_taken_values() {
        assert_eq!(fresh_id(100, vec![1, 2]), 100);
        assert_eq!(fresh_id(100, vec![100, 101, 103]), 102);
    }

    #[test]
    fn today_bounds_cover_the_whole_local_day() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 15, 30, 0).unwrap();
        let (key, start, end) = today_bounds_local(&now);
        assert_eq!(key, "2026-03-14");
        assert!(start <= now.timestamp_millis() && now.timestamp_millis() <= end);
        assert_eq!(local_from_ms(start).unwrap().date_naive(), now.date_naive());
        assert_eq!(local_from_ms(end).unwrap().date_naive(), now.date_naive());
        assert_ne!(local_from_ms(end + 1).unwrap().date_naive(), now.date_naive());
    }

    #[test]
    fn weekday_starts_on_sunday() {
        // 2026-03-15 is a Sunday.
        let sunday = Local.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(weekday_index(&sunday), 0);
        let saturday = Local.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();
        assert_eq!(weekday_index(&saturday), 6);
    }

    #[test]
    fn validates_date_and_time_formats() {
        assert!(is_valid_date_key("2026-01-31"));
        assert!(!is_valid_date_key("31/01/2026"));
        assert!(is_valid_time("09:05"));
        assert!(!is_valid_time("9:05"));
        assert!(!is_valid_time("25:00"));
    }
}
