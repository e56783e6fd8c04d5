//! Field specs and typed filter values
//!
//! A [`FieldSpec`] declares one exposed field of a resource: its name, its
//! value type, and, when the field is filterable, the SQL predicate the
//! filter compiles to. Raw query-string values are parsed into typed
//! [`BindValue`]s before they reach the database layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Value type of an exposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 64-bit integer
    Int,
    /// UTF-8 text
    Text,
    /// Boolean, accepted as `true`/`false`/`1`/`0`
    Bool,
    /// UTC timestamp, accepted as RFC 3339 or `YYYY-MM-DD[ HH:MM:SS]`
    DateTime,
    /// Free-form JSON; compared textually when filtered
    Json,
}

/// A typed value ready to be bound into a SQL query.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

/// Error raised when a raw filter value does not parse as the field's type.
#[derive(Debug, Error)]
#[error("expected {expected}, got '{raw}'")]
pub struct ValueParseError {
    pub expected: &'static str,
    pub raw: String,
}

impl FieldType {
    /// Parse a raw query-string value into a typed bind value.
    pub fn parse(&self, raw: &str) -> Result<BindValue, ValueParseError> {
        match self {
            FieldType::Int => raw
                .parse::<i64>()
                .map(BindValue::Int)
                .map_err(|_| ValueParseError {
                    expected: "an integer",
                    raw: raw.to_string(),
                }),
            FieldType::Text | FieldType::Json => Ok(BindValue::Text(raw.to_string())),
            FieldType::Bool => match raw {
                "true" | "1" => Ok(BindValue::Bool(true)),
                "false" | "0" => Ok(BindValue::Bool(false)),
                _ => Err(ValueParseError {
                    expected: "a boolean",
                    raw: raw.to_string(),
                }),
            },
            FieldType::DateTime => parse_datetime(raw).ok_or_else(|| ValueParseError {
                expected: "a timestamp",
                raw: raw.to_string(),
            }),
        }
    }
}

fn parse_datetime(raw: &str) -> Option<BindValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(BindValue::DateTime(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(BindValue::DateTime(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(BindValue::DateTime(date.and_hms_opt(0, 0, 0)?.and_utc()));
    }
    None
}

/// Declaration of one exposed field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name as it appears in payloads and filter parameters
    pub name: &'static str,
    /// Value type, used to parse filter values
    pub ty: FieldType,
    /// Equality-filter predicate with exactly one `?` placeholder, written
    /// against the record source's query. `None` means not filterable.
    pub filter: Option<&'static str>,
}

impl FieldSpec {
    /// Declare a non-filterable field.
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            filter: None,
        }
    }

    /// Allow equality filtering through the given SQL predicate.
    pub fn filterable(mut self, predicate: &'static str) -> Self {
        self.filter = Some(predicate);
        self
    }
}

/// An equality filter compiled against a resource's whitelist: the SQL
/// predicate fragment plus the typed value to bind into its placeholder.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub sql: &'static str,
    pub value: BindValue,
}
