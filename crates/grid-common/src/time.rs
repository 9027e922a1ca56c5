//! Timestamp normalization for cache-friendly requests.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Timelike};

use crate::error::{GridError, GridResult};

/// Truncate a timestamp to the top of its hour, keeping its offset.
///
/// Requests within the same hour map to the same cache entry.
pub fn normalize_to_hour(ts: DateTime<FixedOffset>) -> GridResult<DateTime<FixedOffset>> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| GridError::InvalidTime(ts.to_rfc3339()))
}

/// Truncate a timestamp to local midnight, keeping its offset.
pub fn normalize_to_day(ts: DateTime<FixedOffset>) -> GridResult<DateTime<FixedOffset>> {
    let midnight = ts.date_naive().and_time(NaiveTime::MIN);
    ts.offset()
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| GridError::InvalidTime(ts.to_rfc3339()))
}

/// Parse an RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> GridResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).map_err(|e| GridError::InvalidTime(format!("{}: {}", s, e)))
}
