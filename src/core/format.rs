use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Display;

/// Placeholder for absent values in tables and the detail modal
pub const PLACEHOLDER: &str = "-";

/// Render an optional value, substituting the placeholder when absent.
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Like [`or_dash`] but blank strings also count as absent
pub fn text_or_dash(value: Option<&str>) -> String {
    or_dash(value.filter(|v| !v.trim().is_empty()))
}

/// Format a backend timestamp as `YYYY-MM-DD`.
///
/// Accepts RFC 3339 timestamps, zone-less `LocalDateTime` values and plain
/// dates. Anything else is returned unchanged.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date(Some("2024-03-05T10:20:30")), "2024-03-05");
        assert_eq!(format_date(Some("2024-03-05T10:20:30.123456")), "2024-03-05");
        assert_eq!(format_date(Some("2024-03-05T10:20:30+09:00")), "2024-03-05");
        assert_eq!(format_date(Some("2024-03-05")), "2024-03-05");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(or_dash(Some(170)), "170");
        assert_eq!(or_dash::<i32>(None), "-");
        assert_eq!(text_or_dash(Some("  ")), "-");
        assert_eq!(text_or_dash(Some("Tokyo")), "Tokyo");
    }
}
