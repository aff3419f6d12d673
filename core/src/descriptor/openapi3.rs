#![deny(missing_docs)]

//! # OpenAPI 3.x Parameters
//!
//! Reads `utoipa` parameter objects as descriptors.
//!
//! OAS 3 moves `type`/`format` into the parameter's `schema`, and replaces
//! `collectionFormat` with `style` + `explode`:
//!
//! | style            | explode | collection format |
//! |------------------|---------|-------------------|
//! | `form`           | true    | `multi`           |
//! | `form`           | false   | `csv`             |
//! | `simple`         | any     | `csv`             |
//! | `spaceDelimited` | false   | `ssv`             |
//! | `pipeDelimited`  | false   | `pipes`           |
//!
//! `matrix`, `label` and `deepObject` have no flat representation and yield no format.

use super::{CollectionFormat, ParamFormat, ParamLocation, ParamType, ParameterDescriptor, TypeSpec};
use crate::error::{ParamError, ParamResult};
use serde_json::Value as JsonValue;
use utoipa::openapi::path::{Operation, Parameter, ParameterIn, ParameterStyle, PathItem};
use utoipa::openapi::schema::{ArrayItems, KnownFormat, Schema, SchemaFormat, SchemaType, Type};
use utoipa::openapi::{OpenApi, RefOr, Required};

/// Parses an OpenAPI 3.x document from YAML.
pub fn parse_openapi_yaml(yaml: &str) -> ParamResult<OpenApi> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Collects the parameters that apply to one operation.
///
/// Parameters declared on the path item are inherited; an operation parameter
/// with the same name and location overrides the inherited one.
pub fn operation_parameters(
    openapi: &OpenApi,
    path: &str,
    method: &str,
) -> ParamResult<Vec<Parameter>> {
    let path_item = openapi
        .paths
        .paths
        .get(path)
        .ok_or_else(|| ParamError::definition(format!("Path '{}' is not documented", path)))?;
    let operation = operation_for(path_item, method).ok_or_else(|| {
        ParamError::definition(format!(
            "Operation {} '{}' is not documented",
            method.to_ascii_uppercase(),
            path
        ))
    })?;

    let mut params: Vec<Parameter> = Vec::new();
    let inherited = path_item.parameters.as_deref().unwrap_or(&[]);
    let own = operation.parameters.as_deref().unwrap_or(&[]);
    for param in inherited.iter().chain(own) {
        let location = param.location();
        match params
            .iter_mut()
            .find(|p| p.name == param.name && p.location() == location)
        {
            Some(existing) => *existing = param.clone(),
            None => params.push(param.clone()),
        }
    }
    Ok(params)
}

fn operation_for<'a>(path_item: &'a PathItem, method: &str) -> Option<&'a Operation> {
    match method.to_ascii_lowercase().as_str() {
        "get" => path_item.get.as_ref(),
        "put" => path_item.put.as_ref(),
        "post" => path_item.post.as_ref(),
        "delete" => path_item.delete.as_ref(),
        "options" => path_item.options.as_ref(),
        "head" => path_item.head.as_ref(),
        "patch" => path_item.patch.as_ref(),
        "trace" => path_item.trace.as_ref(),
        _ => None,
    }
}

/// Maps a schema's declared type onto a primitive parameter type.
///
/// References and composite schemas are not followed; they resolve as `string`.
fn schema_param_type(schema: &RefOr<Schema>) -> ParamType {
    match schema {
        RefOr::Ref(_) => ParamType::String,
        RefOr::T(Schema::Array(_)) => ParamType::Array,
        RefOr::T(Schema::Object(obj)) => match &obj.schema_type {
            SchemaType::Type(ty) => primitive(ty),
            // OAS 3.1 `type: [integer, "null"]`
            SchemaType::Array(types) => types
                .iter()
                .find(|t| !matches!(t, Type::Null))
                .map(primitive)
                .unwrap_or_default(),
            SchemaType::AnyValue => ParamType::String,
        },
        RefOr::T(_) => ParamType::String,
    }
}

fn primitive(ty: &Type) -> ParamType {
    match ty {
        Type::Integer => ParamType::Integer,
        Type::Number => ParamType::Number,
        Type::Boolean => ParamType::Boolean,
        Type::Array => ParamType::Array,
        _ => ParamType::String,
    }
}

fn schema_format(schema: &RefOr<Schema>) -> Option<ParamFormat> {
    let RefOr::T(Schema::Object(obj)) = schema else {
        return None;
    };
    match obj.format.as_ref()? {
        SchemaFormat::KnownFormat(KnownFormat::Date) => Some(ParamFormat::Date),
        SchemaFormat::KnownFormat(KnownFormat::DateTime) => Some(ParamFormat::DateTime),
        SchemaFormat::KnownFormat(KnownFormat::Int32) => Some(ParamFormat::Int32),
        SchemaFormat::KnownFormat(KnownFormat::Int64) => Some(ParamFormat::Int64),
        SchemaFormat::KnownFormat(KnownFormat::Float) => Some(ParamFormat::Float),
        SchemaFormat::KnownFormat(KnownFormat::Double) => Some(ParamFormat::Double),
        SchemaFormat::Custom(custom) => Some(ParamFormat::from(custom.clone())),
        // Other known formats do not affect coercion.
        SchemaFormat::KnownFormat(_) => None,
    }
}

fn schema_items(schema: &RefOr<Schema>) -> Option<&dyn TypeSpec> {
    match schema {
        RefOr::T(Schema::Array(arr)) => match &arr.items {
            ArrayItems::RefOrSchema(item) => Some(item.as_ref() as &dyn TypeSpec),
            _ => None,
        },
        _ => None,
    }
}

fn schema_default(schema: &RefOr<Schema>) -> Option<&JsonValue> {
    match schema {
        RefOr::T(Schema::Object(obj)) => obj.default.as_ref(),
        _ => None,
    }
}

/// Item schemas of OpenAPI 3 arrays.
///
/// Nested arrays have no serialization style of their own, so they are comma separated.
impl TypeSpec for RefOr<Schema> {
    fn param_type(&self) -> ParamType {
        schema_param_type(self)
    }

    fn format(&self) -> Option<ParamFormat> {
        schema_format(self)
    }

    fn collection_format(&self) -> Option<CollectionFormat> {
        (schema_param_type(self) == ParamType::Array).then_some(CollectionFormat::Csv)
    }

    fn items(&self) -> Option<&dyn TypeSpec> {
        schema_items(self)
    }
}

impl TypeSpec for Parameter {
    fn param_type(&self) -> ParamType {
        self.schema
            .as_ref()
            .map(schema_param_type)
            .unwrap_or_default()
    }

    fn format(&self) -> Option<ParamFormat> {
        self.schema.as_ref().and_then(schema_format)
    }

    fn collection_format(&self) -> Option<CollectionFormat> {
        // Defaults per location: query/cookie use `form`, path/header use `simple`.
        let style = self.style.clone().unwrap_or(match self.parameter_in {
            ParameterIn::Query | ParameterIn::Cookie => ParameterStyle::Form,
            ParameterIn::Path | ParameterIn::Header => ParameterStyle::Simple,
        });
        let explode = self
            .explode
            .unwrap_or(matches!(style, ParameterStyle::Form));

        match style {
            ParameterStyle::Form if explode => Some(CollectionFormat::Multi),
            ParameterStyle::Form | ParameterStyle::Simple => Some(CollectionFormat::Csv),
            ParameterStyle::SpaceDelimited => Some(CollectionFormat::Ssv),
            ParameterStyle::PipeDelimited => Some(CollectionFormat::Pipes),
            ParameterStyle::Matrix | ParameterStyle::Label | ParameterStyle::DeepObject => None,
        }
    }

    fn items(&self) -> Option<&dyn TypeSpec> {
        self.schema.as_ref().and_then(schema_items)
    }
}

impl ParameterDescriptor for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> ParamLocation {
        match self.parameter_in {
            ParameterIn::Query => ParamLocation::Query,
            ParameterIn::Path => ParamLocation::Path,
            ParameterIn::Header => ParamLocation::Header,
            ParameterIn::Cookie => ParamLocation::Cookie,
        }
    }

    fn required(&self) -> bool {
        self.required == Required::True || matches!(self.parameter_in, ParameterIn::Path)
    }

    fn default_value(&self) -> Option<&JsonValue> {
        self.schema.as_ref().and_then(schema_default)
    }
}
