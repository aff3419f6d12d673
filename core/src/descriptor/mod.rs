#![deny(missing_docs)]

//! # Parameter Descriptors
//!
//! The read-only view the resolver needs of a declared parameter.
//!
//! - **shim**: Swagger 2.0 style parameter objects (`in`, `type`, `items`, `collectionFormat`).
//! - **openapi3**: `TypeSpec`/`ParameterDescriptor` for `utoipa` OpenAPI 3.x parameters.

pub mod openapi3;
pub mod shim;

pub use openapi3::{operation_parameters, parse_openapi_yaml};
pub use shim::{parse_parameters_yaml, Items, Parameter};

use crate::error::ParamError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Where a parameter is carried in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum ParamLocation {
    /// Query string.
    Query,
    /// Templated path segment.
    Path,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Field of the (JSON) request body.
    Body,
    /// Field of a urlencoded form body (Swagger 2.0 `formData`).
    FormData,
}

impl ParamLocation {
    /// The canonical OpenAPI spelling (`query`, `formData`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamLocation {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            "body" => Ok(Self::Body),
            "formdata" | "form" => Ok(Self::FormData),
            other => Err(ParamError::definition(format!(
                "Unsupported parameter location '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ParamLocation {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The primitive type a parameter value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ParamType {
    /// `string`
    #[default]
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
}

impl ParamType {
    /// The OpenAPI spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            other => Err(ParamError::definition(format!(
                "Unsupported parameter type '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ParamType {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Format modifier of a primitive type.
///
/// Only the formats that change coercion are named; the rest are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamFormat {
    /// `date` (full-date, RFC 3339).
    Date,
    /// `date-time` (RFC 3339).
    DateTime,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `float`
    Float,
    /// `double`
    Double,
    /// Any other format string.
    Other(String),
}

impl From<String> for ParamFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "date" => Self::Date,
            "date-time" => Self::DateTime,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => Self::Other(value),
        }
    }
}

impl From<ParamFormat> for String {
    fn from(value: ParamFormat) -> Self {
        match value {
            ParamFormat::Date => "date".into(),
            ParamFormat::DateTime => "date-time".into(),
            ParamFormat::Int32 => "int32".into(),
            ParamFormat::Int64 => "int64".into(),
            ParamFormat::Float => "float".into(),
            ParamFormat::Double => "double".into(),
            ParamFormat::Other(s) => s,
        }
    }
}

/// How an array value is serialized into a single raw value (Swagger 2.0 `collectionFormat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    /// Comma separated: `a,b,c`.
    Csv,
    /// Space separated: `a b c`.
    Ssv,
    /// Tab separated.
    Tsv,
    /// Pipe separated: `a|b|c`.
    Pipes,
    /// Repeated keys: `?id=a&id=b`.
    Multi,
}

impl CollectionFormat {
    /// The item separator, `None` for `multi`.
    pub fn separator(&self) -> Option<char> {
        match self {
            Self::Csv => Some(','),
            Self::Ssv => Some(' '),
            Self::Tsv => Some('\t'),
            Self::Pipes => Some('|'),
            Self::Multi => None,
        }
    }
}

/// Type information shared by parameters and array item schemas.
pub trait TypeSpec {
    /// Declared primitive type.
    fn param_type(&self) -> ParamType;

    /// Declared format modifier, if any.
    fn format(&self) -> Option<ParamFormat>;

    /// How array values are serialized. Only consulted for arrays.
    fn collection_format(&self) -> Option<CollectionFormat>;

    /// Item schema of an array.
    fn items(&self) -> Option<&dyn TypeSpec>;
}

/// A declared request parameter.
pub trait ParameterDescriptor: TypeSpec {
    /// Parameter name as it appears in the request.
    fn name(&self) -> &str;

    /// Which request collection carries the parameter.
    fn location(&self) -> ParamLocation;

    /// Whether the parameter must be present. Path parameters always are.
    fn required(&self) -> bool;

    /// Declared default value, used when an optional parameter is absent.
    fn default_value(&self) -> Option<&JsonValue>;
}

impl<T: TypeSpec + ?Sized> TypeSpec for &T {
    fn param_type(&self) -> ParamType {
        (**self).param_type()
    }

    fn format(&self) -> Option<ParamFormat> {
        (**self).format()
    }

    fn collection_format(&self) -> Option<CollectionFormat> {
        (**self).collection_format()
    }

    fn items(&self) -> Option<&dyn TypeSpec> {
        (**self).items()
    }
}

impl<T: ParameterDescriptor + ?Sized> ParameterDescriptor for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn location(&self) -> ParamLocation {
        (**self).location()
    }

    fn required(&self) -> bool {
        (**self).required()
    }

    fn default_value(&self) -> Option<&JsonValue> {
        (**self).default_value()
    }
}
