//! # Resolved Values
//!
//! The typed result of coercing a raw request value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A parameter value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `string` without a date format.
    String(String),
    /// `integer`
    Integer(i64),
    /// `number`
    Number(f64),
    /// `boolean`
    Boolean(bool),
    /// `string` with `date` or `date-time` format, normalised to UTC.
    DateTime(DateTime<Utc>),
    /// `array`, items coerced individually.
    Array(Vec<ParamValue>),
}

impl ParamValue {
    /// Returns the string slice if this is a plain string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a date or date-time.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the items if this is an array.
    pub fn as_array(&self) -> Option<&[ParamValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Converts into a JSON value. Timestamps become RFC 3339 strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Number(n) => JsonValue::from(*n),
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}
