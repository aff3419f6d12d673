//! # Error Handling
//!
//! Provides the `ParamError` enum returned by every fallible operation in the crate.

use crate::descriptor::ParamLocation;
use derive_more::{Display, From};

/// The crate-wide error enum.
///
/// We use `derive_more` for boilerplate.
/// Only the document parsing errors convert implicitly; resolution errors
/// are always constructed explicitly so they carry the parameter name.
#[derive(Debug, Display, From)]
pub enum ParamError {
    /// The parameter is absent from the collection its location designates.
    #[from(ignore)]
    #[display("Missing parameter '{name}' in {location}")]
    MissingParameter {
        /// Parameter name as declared.
        name: String,
        /// Where the parameter was looked up.
        location: ParamLocation,
    },

    /// The parameter is present but its value cannot be coerced to the declared type.
    #[from(ignore)]
    #[display("The value '{value}' for the '{name}' field must be {expected}")]
    InvalidParameterType {
        /// Parameter name as declared.
        name: String,
        /// The raw value as received.
        value: String,
        /// Human readable expected type (e.g. "an integer", "a date").
        expected: String,
    },

    /// The descriptor cannot be used to resolve a value at all.
    #[from(ignore)]
    #[display("Invalid parameter definition: {_0}")]
    InvalidParameterDefinition(String),

    /// A YAML document (descriptor or configuration) failed to parse.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A JSON document (descriptor or configuration) failed to parse.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for ParamError {}

impl ParamError {
    /// Shorthand for [`ParamError::InvalidParameterType`].
    pub fn invalid_type(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidParameterType {
            name: name.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Shorthand for [`ParamError::InvalidParameterDefinition`].
    pub fn definition(msg: impl Into<String>) -> Self {
        Self::InvalidParameterDefinition(msg.into())
    }

    /// Whether this error was caused by the request rather than the descriptor.
    ///
    /// Callers typically map these to `400 Bad Request`.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::InvalidParameterType { .. }
        )
    }
}

/// Helper type alias for Result using ParamError.
pub type ParamResult<T> = Result<T, ParamError>;
