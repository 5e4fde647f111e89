//! Timestamp handling for the chat log.
//!
//! Records are written in IST with an explicit offset. Older rows may carry
//! other shapes (naive UTC, ISO-8601), so display goes through
//! [`normalize_to_ist`], which tries each known shape in order and falls back
//! to the raw string.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// Format written to the `timestamp` column, e.g. `2025-11-19 17:18:05 +0530`.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Canonical display format.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// India Standard Time, UTC+05:30.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current time in IST, formatted for storage.
pub fn now_ist_stamp() -> String {
    Utc::now().with_timezone(&ist()).format(STORAGE_FORMAT).to_string()
}

/// Convert a stored timestamp to `YYYY-MM-DD HH:MM:SS` in IST.
///
/// Returns the input unchanged when no known format matches.
pub fn normalize_to_ist(ts: &str) -> String {
    let trimmed = ts.trim();
    parse_with_offset(trimmed)
        .or_else(|| parse_naive_utc(trimmed))
        .or_else(|| parse_iso8601(trimmed))
        .map(|dt| dt.with_timezone(&ist()).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_with_offset(ts: &str) -> Option<DateTime<FixedOffset>> {
    if !has_numeric_offset_suffix(ts) {
        return None;
    }
    DateTime::parse_from_str(ts, STORAGE_FORMAT).ok()
}

fn parse_naive_utc(ts: &str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(ts, DISPLAY_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

fn parse_iso8601(ts: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt);
    }
    // Offset without a colon, e.g. 2025-11-19T17:18:05+0530
    if let Ok(dt) = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
    // A bare date means midnight UTC.
    .or_else(|| {
        NaiveDate::parse_from_str(ts, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
    .map(|naive| naive.and_utc().fixed_offset())
}

/// True when the string ends in ` +HHMM` or ` -HHMM`.
fn has_numeric_offset_suffix(ts: &str) -> bool {
    let bytes = ts.as_bytes();
    if bytes.len() < 6 {
        return false;
    }
    let suffix = &bytes[bytes.len() - 5..];
    matches!(suffix[0], b'+' | b'-') && suffix[1..].iter().all(u8::is_ascii_digit)
}
