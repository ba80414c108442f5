//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{UserRole, WebhookEvent};

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| {
        SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Convert a u8 to UserRole
pub fn role_from_u8(value: u8) -> UserRole {
    match value {
        3 => UserRole::Admin,
        2 => UserRole::Producer,
        _ => UserRole::Viewer,
    }
}

/// Convert a UserRole to its stored integer
pub fn role_to_u8(role: UserRole) -> u8 {
    match role {
        UserRole::Admin => 3,
        UserRole::Producer => 2,
        UserRole::Viewer => 1,
    }
}

/// Encode webhook event subscriptions as a comma-separated list
pub fn events_to_string(events: &[WebhookEvent]) -> String {
    events
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode webhook event subscriptions, skipping unknown names
pub fn events_from_string(value: &str) -> Vec<WebhookEvent> {
    value
        .split(',')
        .filter_map(WebhookEvent::from_str)
        .collect()
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
