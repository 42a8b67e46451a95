//! Time parsing and formatting at the I/O boundary.
//!
//! The matching core works in Unix epoch milliseconds throughout; `chrono`
//! only appears here, where feed strings are parsed and report timestamps are
//! rendered.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::{CheckerError, Result};

/// Exact format of the locations-of-interest feed time strings,
/// e.g. `"11/08/2021, 9:30 am"`. Any deviation fails parsing.
pub const LOI_TIME_FORMAT: &str = "%d/%m/%Y, %I:%M %p";

/// Format used when rendering timestamps into the report.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a feed time string into Unix epoch milliseconds.
///
/// The feed carries naive local times; `utc_offset` anchors them to an
/// absolute instant. The offset is caller-supplied configuration, never
/// derived from the host environment.
pub fn parse_loi_time(value: &str, utc_offset: FixedOffset) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), LOI_TIME_FORMAT).map_err(|source| {
        CheckerError::InvalidTime {
            value: value.to_string(),
            source,
        }
    })?;
    let anchored = naive
        .and_local_timezone(utc_offset)
        .single()
        .ok_or_else(|| CheckerError::MalformedFeed {
            message: format!("time '{value}' is ambiguous in offset {utc_offset}"),
        })?;
    Ok(anchored.timestamp_millis())
}

/// Render an epoch-milliseconds timestamp in the given offset.
///
/// Falls back to the raw millisecond value if it is outside chrono's
/// representable range.
pub fn format_timestamp_ms(timestamp_ms: i64, utc_offset: FixedOffset) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt
            .with_timezone(&utc_offset)
            .format(DISPLAY_TIME_FORMAT)
            .to_string(),
        None => timestamp_ms.to_string(),
    }
}

/// Render an epoch-milliseconds timestamp as UTC.
pub fn format_timestamp_utc(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format(DISPLAY_TIME_FORMAT).to_string(),
        None => timestamp_ms.to_string(),
    }
}
