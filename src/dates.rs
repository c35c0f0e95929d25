//! Date Helpers
//!
//! Conversions between the `d/m/Y` form inputs, the ISO dates the API speaks,
//! and the Sunday-based work week of the calendar.

use chrono::{Datelike, Duration, NaiveDate};

const ISO: &str = "%Y-%m-%d";

/// Parse user input in `d/m/Y`. `.` and `-` are accepted as separators and
/// eight bare digits are read as `ddmmyyyy`.
pub fn parse_display(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = if trimmed.len() == 8 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{}/{}/{}", &trimmed[0..2], &trimmed[2..4], &trimmed[4..])
    } else {
        trimmed.replace(['.', '-'], "/")
    };
    let mut parts = normalized.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

pub fn parse_iso(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO).ok()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO).to_string()
}

/// `dd/mm/yyyy`, as shown in headers and form inputs
pub fn to_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// ISO to form input; empty or unparseable input yields an empty string
pub fn iso_to_display(input: &str) -> String {
    parse_iso(input).map(to_display).unwrap_or_default()
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// The first `count` days of the week containing `date`
pub fn week_days(date: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..count as i64).map(|i| start + Duration::days(i)).collect()
}

/// Move by whole weeks
pub fn shift_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    date + Duration::weeks(weeks)
}

/// True when a task scheduled from `start` (to `end`, if any) covers `day`
pub fn covers(start: Option<&str>, end: Option<&str>, day: NaiveDate) -> bool {
    let Some(start) = start.and_then(parse_iso) else {
        return false;
    };
    match end.and_then(parse_iso) {
        Some(end) => start <= day && day <= end,
        None => start == day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_display_variants() {
        assert_eq!(parse_display("5/3/2026"), Some(ymd(2026, 3, 5)));
        assert_eq!(parse_display("05.03.2026"), Some(ymd(2026, 3, 5)));
        assert_eq!(parse_display("05-03-2026"), Some(ymd(2026, 3, 5)));
        assert_eq!(parse_display("05032026"), Some(ymd(2026, 3, 5)));
        assert_eq!(parse_display("31/02/2026"), None);
        assert_eq!(parse_display("1/2"), None);
        assert_eq!(parse_display(""), None);
    }

    #[test]
    fn test_iso_display_conversions() {
        assert_eq!(parse_display("5/3/2026").map(to_iso).as_deref(), Some("2026-03-05"));
        assert_eq!(iso_to_display("2026-03-05"), "05/03/2026");
        assert_eq!(iso_to_display("garbage"), "");
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2026-10-18 is a Sunday
        assert_eq!(week_start(ymd(2026, 10, 18)), ymd(2026, 10, 18));
        assert_eq!(week_start(ymd(2026, 10, 22)), ymd(2026, 10, 18));
        assert_eq!(week_start(ymd(2026, 10, 24)), ymd(2026, 10, 18));
        let days = week_days(ymd(2026, 10, 21), 5);
        assert_eq!(days.first(), Some(&ymd(2026, 10, 18)));
        assert_eq!(days.last(), Some(&ymd(2026, 10, 22)));
    }

    #[test]
    fn test_covers() {
        let day = ymd(2026, 10, 20);
        assert!(covers(Some("2026-10-20"), None, day));
        assert!(covers(Some("2026-10-18"), Some("2026-10-22"), day));
        assert!(!covers(Some("2026-10-21"), Some("2026-10-22"), day));
        assert!(!covers(None, Some("2026-10-22"), day));
    }
}
