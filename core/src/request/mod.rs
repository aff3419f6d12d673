#![deny(missing_docs)]

//! # Request Access
//!
//! The read-only, per-location view of an inbound request.
//!
//! - **memory**: A fully materialized request built by hand (tests, framework glue).
//! - **http_request**: An adapter over `http::Request` with router-supplied path parameters.

pub mod http_request;
pub mod memory;

pub use http_request::HttpRequest;
pub use memory::MemoryRequest;

use crate::descriptor::ParamLocation;
use serde_json::Value as JsonValue;

/// A raw value as found in the request, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<'a> {
    /// A single textual value (query, path, header, cookie, form).
    Text(&'a str),
    /// A key that occurred more than once, in request order.
    Multi(Vec<&'a str>),
    /// A field of a JSON body.
    Json(&'a JsonValue),
}

impl RawValue<'_> {
    /// Renders the value for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(s) => (*s).to_string(),
            Self::Multi(values) => values.join(","),
            Self::Json(JsonValue::String(s)) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }
}

/// Per-location key lookup on an inbound request.
pub trait RequestAccessor {
    /// Returns the raw value stored under `name` in the collection for `location`.
    fn lookup(&self, location: ParamLocation, name: &str) -> Option<RawValue<'_>>;
}

impl<T: RequestAccessor + ?Sized> RequestAccessor for &T {
    fn lookup(&self, location: ParamLocation, name: &str) -> Option<RawValue<'_>> {
        (**self).lookup(location, name)
    }
}

/// Turns the values stored for one key into a `RawValue`.
pub(crate) fn raw_from_values(values: &[String]) -> Option<RawValue<'_>> {
    match values {
        [] => None,
        [single] => Some(RawValue::Text(single)),
        many => Some(RawValue::Multi(many.iter().map(String::as_str).collect())),
    }
}
