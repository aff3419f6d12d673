//! # In-Memory Requests
//!
//! A request whose collections are already parsed into maps, built with
//! chained `with_*` calls.

use super::{raw_from_values, RawValue, RequestAccessor};
use crate::descriptor::ParamLocation;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// A fully materialized request.
///
/// Query and form keys may repeat; header names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRequest {
    query: IndexMap<String, Vec<String>>,
    path: IndexMap<String, String>,
    headers: IndexMap<String, Vec<String>>,
    cookies: IndexMap<String, String>,
    body: Map<String, JsonValue>,
    form: IndexMap<String, Vec<String>>,
}

impl MemoryRequest {
    /// Creates a request with every collection empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter. Repeating a key keeps every value.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Sets a path parameter.
    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    /// Appends a header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into().to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Sets a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets one field of the JSON body.
    pub fn with_body_field(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.body.insert(name.into(), value);
        self
    }

    /// Replaces the JSON body. Non-object bodies have no fields.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = match body {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Appends a urlencoded form field.
    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.entry(name.into()).or_default().push(value.into());
        self
    }
}

impl RequestAccessor for MemoryRequest {
    fn lookup(&self, location: ParamLocation, name: &str) -> Option<RawValue<'_>> {
        match location {
            ParamLocation::Query => self.query.get(name).and_then(|v| raw_from_values(v)),
            ParamLocation::Path => self.path.get(name).map(|v| RawValue::Text(v)),
            ParamLocation::Header => self
                .headers
                .get(&name.to_ascii_lowercase())
                .and_then(|v| raw_from_values(v)),
            ParamLocation::Cookie => self.cookies.get(name).map(|v| RawValue::Text(v)),
            ParamLocation::Body => self.body.get(name).map(RawValue::Json),
            ParamLocation::FormData => self.form.get(name).and_then(|v| raw_from_values(v)),
        }
    }
}
