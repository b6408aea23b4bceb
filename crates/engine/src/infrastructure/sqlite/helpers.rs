//! Row conversion helpers shared by the SQLite repositories.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::infrastructure::ports::RepoError;

pub(super) fn column<'r, T>(row: &'r SqliteRow, name: &'static str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::database("decode_row", e))
}

pub(super) fn parse<T>(raw: &str) -> Result<T, RepoError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(RepoError::serialization)
}

pub(super) fn parse_opt<T>(raw: Option<String>) -> Result<Option<T>, RepoError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.as_deref().map(parse).transpose()
}

pub(super) fn parse_time(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

pub(super) fn parse_time_opt(raw: Option<String>) -> Result<Option<DateTime<Utc>>, RepoError> {
    raw.as_deref().map(parse_time).transpose()
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(RepoError::serialization)
}

pub(super) fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, RepoError> {
    serde_json::from_str(raw).map_err(RepoError::serialization)
}

/// SQLite integers are signed; counters above `i64::MAX` saturate.
pub(super) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Negative values read back from a counter column clamp to zero.
pub(super) fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
