//! Decoding helpers for values SQLite stores as text.
//!
//! Decimals and timestamps are persisted as strings. A value that fails to
//! parse is reported as a corrupt column rather than replaced by a default.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use perfolio_core::errors::{DatabaseError, Error, Result};
use rust_decimal::Decimal;

fn corrupt(column: &str, value: &str, reason: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::CorruptValue(format!(
        "{} = '{}': {}",
        column, value, reason
    )))
}

pub fn parse_decimal(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| corrupt(column, value, e))
}

pub fn parse_optional_decimal(column: &str, value: Option<&str>) -> Result<Option<Decimal>> {
    value.map(|v| parse_decimal(column, v)).transpose()
}

pub fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(column, value, e))
}
