//! # Date Handling Utilities
//!
//! Timestamps arrive from the management API in several shapes (RFC 3339,
//! naive ISO datetimes without an offset, plain dates). These helpers turn
//! them into stable display strings and fall back to the raw value when the
//! format is not recognized.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Placeholder shown when a timestamp is absent.
pub const MISSING_TIMESTAMP: &str = "N/A";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a server timestamp, treating offset-less values as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Date-only rendering used by table cells, e.g. `2025-03-14`.
///
/// # Example
/// ```rust
/// use mcpdash_util::format_date;
///
/// assert_eq!(format_date(Some("2025-03-14T09:26:53Z")), "2025-03-14");
/// assert_eq!(format_date(None), "N/A");
/// ```
pub fn format_date(raw: Option<&str>) -> String {
    format_with(raw, "%Y-%m-%d")
}

/// Full rendering used by the detail view, e.g. `2025-03-14 09:26:53 UTC`.
pub fn format_date_time(raw: Option<&str>) -> String {
    format_with(raw, "%Y-%m-%d %H:%M:%S UTC")
}

fn format_with(raw: Option<&str>, pattern: &str) -> String {
    match raw.map(str::trim) {
        None | Some("") => MISSING_TIMESTAMP.to_string(),
        Some(value) => parse_timestamp(value)
            .map(|timestamp| timestamp.format(pattern).to_string())
            .unwrap_or_else(|| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_shapes() {
        assert_eq!(format_date(Some("2025-03-14T09:26:53.123456")), "2025-03-14");
        assert_eq!(format_date(Some("2025-03-14T23:30:00-02:00")), "2025-03-15");
        assert_eq!(format_date(Some("2025-03-14")), "2025-03-14");
        assert_eq!(format_date_time(Some("2025-03-14 09:26:53")), "2025-03-14 09:26:53 UTC");
    }

    #[test]
    fn missing_and_unparseable_values() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("   ")), "N/A");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
    }
}
