//! Datetime handling
//!
//! Timestamps are UTC throughout; user input accepts RFC 3339 or a plain
//! date taken as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Current UTC time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a user-supplied timestamp
///
/// Accepts RFC 3339 (`2024-08-15T14:30:00Z`) or `YYYY-MM-DD`, which is
/// taken as midnight UTC on that date.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    Err(TrackerError::new(TrackerErrorKind::InvalidInput).with_message(format!(
        "could not parse '{}' as RFC 3339 or YYYY-MM-DD",
        input
    )))
}

/// Format a timestamp for report output
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}
