//! Row-to-entity parsing helpers.
//!
//! Repos read `libsql::Row` by column index. Structured columns (tags,
//! connector, settings, users) are stored as JSON text.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Timestamps are written with `to_rfc3339()`; anything else in a time column
/// means the row was not written by caselog.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if `s` is not RFC 3339.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidState(format!("timestamp '{s}' is not RFC 3339: {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::InvalidState` for a present but malformed value.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    s.map(parse_datetime).transpose()
}

/// Enum columns hold the same literal as the enum's serde form.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for an unknown literal.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_owned()))
        .map_err(|e| DatabaseError::InvalidState(format!("unknown literal '{s}': {e}")))
}

/// Nullable TEXT column; reading `String` from NULL would fail.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?)
}

/// Decode a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the text is not valid JSON for `T`.
pub fn parse_json<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::InvalidState(format!("malformed JSON column: {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::InvalidState` if a present value is malformed.
pub fn parse_optional_json<T: DeserializeOwned>(s: Option<&str>) -> Result<Option<T>, DatabaseError> {
    s.map(parse_json).transpose()
}

/// Encode a value for a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if the value cannot be serialized.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// Convert an `INTEGER` column into a `u64` counter.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative values.
pub fn to_u64(value: i64, column: &str) -> Result<u64, DatabaseError> {
    u64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("negative {column}: {value}")))
}

/// Convert a `u64` counter into an `INTEGER` parameter.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value does not fit.
pub fn to_i64(value: u64, column: &str) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("{column} out of range: {value}")))
}
