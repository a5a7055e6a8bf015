//! Date helpers for FX capture dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse an FX capture date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; timestamps are truncated to their date. Returns `None` for
/// anything else.
pub fn parse_fx_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Format a date the way it is stored on quote records.
pub fn format_fx_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
