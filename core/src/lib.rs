#![deny(missing_docs)]

//! # Param Validator Core
//!
//! Extracts one request parameter's value according to its OpenAPI declaration
//! (name, location, type) and coerces it to the declared primitive type.
//!
//! ```
//! use param_validator_core::{
//!     value_of_param, MemoryRequest, ParamLocation, ParamType, ParamValue, Parameter,
//! };
//!
//! let limit = Parameter::new("limit", ParamLocation::Query, ParamType::Integer);
//! let request = MemoryRequest::new().with_query("limit", "10");
//! assert_eq!(value_of_param(&limit, &request).unwrap(), ParamValue::Integer(10));
//! ```

/// Shared error types.
pub mod error;

/// Resolver configuration.
pub mod config;

/// Parameter descriptors (Swagger 2.0 shim and `utoipa` OpenAPI 3.x).
pub mod descriptor;

/// Per-location request access.
pub mod request;

/// Coerced parameter values.
pub mod value;

/// Raw value coercion.
pub mod coerce;

/// Parameter resolution.
pub mod resolver;

pub use config::{BooleanVocabulary, ResolverConfig};
pub use descriptor::{
    operation_parameters, parse_openapi_yaml, parse_parameters_yaml, CollectionFormat, Items,
    ParamFormat, ParamLocation, ParamType, Parameter, ParameterDescriptor, TypeSpec,
};
pub use error::{ParamError, ParamResult};
pub use request::{HttpRequest, MemoryRequest, RawValue, RequestAccessor};
pub use resolver::{value_of_param, value_of_param_or_default, Resolver};
pub use value::ParamValue;
