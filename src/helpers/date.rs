//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];

/// Parse a front-matter date string in one of the common formats
///
/// Values without an offset are taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Format a date for RSS `<pubDate>`
///
/// # Examples
/// ```ignore
/// date_rfc2822(&date) // -> "Mon, 15 Jan 2024 00:00:00 GMT"
/// ```
pub fn date_rfc2822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!(dt.hour(), 0);

        let dt = parse_date_string("2024/03/02").unwrap();
        assert_eq!((dt.month(), dt.day()), (3, 2));
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));

        let dt = parse_date_string("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_long_form() {
        let dt = parse_date_string("March 22, 2023").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 3, 22));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_date_string(""), None);
        assert_eq!(parse_date_string("not a date"), None);
        assert_eq!(parse_date_string("2024-13-45"), None);
    }

    #[test]
    fn test_rfc2822() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(date_rfc2822(&dt), "Mon, 15 Jan 2024 00:00:00 GMT");
        assert_eq!(date_xml(&dt), "2024-01-15");
    }
}
