//! Shared helpers for reading DuckDB row columns into domain types.
//!
//! Dates and timestamps are selected as `CAST(col AS VARCHAR)` and parsed
//! here, keeping the driver's type mapping out of the store code.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an optional `YYYY-MM-DD` column value.
pub(crate) fn parse_date(value: Option<String>) -> StoreResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| StoreError::DecodeError(format!("bad date '{s}': {e}"))),
    }
}

/// Parse an optional timestamp column value.
///
/// Accepts RFC 3339 and DuckDB's `YYYY-MM-DD HH:MM:SS[.ffffff]` VARCHAR
/// rendering; either way the stored instant is UTC.
pub(crate) fn parse_timestamp(value: Option<String>) -> StoreResult<Option<DateTime<Utc>>> {
    let Some(s) = value else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| StoreError::DecodeError(format!("bad timestamp '{s}': {e}")))
}

/// Render an optional date for a `CAST(? AS DATE)` parameter slot.
pub(crate) fn date_param(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Render an optional timestamp for a `CAST(? AS TIMESTAMP)` parameter slot.
pub(crate) fn timestamp_param(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
}

/// Decode a JSON object column into the staging `extra` map.
///
/// NULL and malformed JSON both decode to an empty map; the extra map is
/// opaque to every loader, so a bad payload here must not fail a read.
pub(crate) fn parse_extra(value: Option<String>) -> serde_json::Map<String, serde_json::Value> {
    value
        .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
        .and_then(|v| match v {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default()
}

/// Decode a JSON string-array column (e.g. person role tags).
pub(crate) fn parse_string_array(value: Option<String>) -> Vec<String> {
    value
        .and_then(|s| serde_json::from_str::<Vec<String>>(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "row_helpers_test.rs"]
mod tests;
