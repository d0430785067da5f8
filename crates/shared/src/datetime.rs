//! Date and time rendering expected by the existing admin and app clients.
//!
//! Timestamps are rendered in the server's local time zone.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// `2024-03-01 08-30-00` (dashes in the time part are part of the client contract).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H-%M-%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATETIME_FORMAT).to_string()
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

pub fn format_naive_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Local midnight of `date` as Unix milliseconds.
pub fn date_to_epoch_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::default());
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_format_uses_dashes_in_time() {
        let at = Local
            .with_ymd_and_hms(2023, 9, 1, 8, 5, 9)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(at), "2023-09-01 08-05-09");
        assert_eq!(format_date(at), "2023-09-01");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-26"),
            NaiveDate::from_ymd_opt(2024, 2, 26)
        );
        assert_eq!(parse_date("2024/02/26"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_epoch_millis_is_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        let millis = date_to_epoch_millis(date);
        let back = Local.timestamp_millis_opt(millis).unwrap();
        assert_eq!(back.date_naive(), date);
        assert_eq!(back.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn test_format_naive_date() {
        let date = NaiveDate::from_ymd_opt(2022, 12, 5).unwrap();
        assert_eq!(format_naive_date(date), "2022-12-05");
    }
}
