#![deny(missing_docs)]

//! # Swagger 2.0 Parameters
//!
//! A local shim for the Swagger 2.0 parameter object, where the primitive
//! `type`, `format`, `items` and `collectionFormat` live directly on the
//! parameter instead of inside a `schema`.

use super::{CollectionFormat, ParamFormat, ParamLocation, ParamType, ParameterDescriptor, TypeSpec};
use crate::error::ParamResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A declared parameter in Swagger 2.0 form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Primitive type. Body parameters declared through `schema` fall back to `string`.
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    /// Format modifier (e.g. int64, date-time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ParamFormat>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
    /// Array serialization.
    #[serde(
        rename = "collectionFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_format: Option<CollectionFormat>,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Value assumed when the parameter is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    /// A brief description of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger 2.0 array item schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items {
    /// Item type.
    #[serde(rename = "type")]
    pub item_type: ParamType,
    /// Item format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ParamFormat>,
    /// Nested item schema for multi-dimensional arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
    /// Serialization of the nested array.
    #[serde(
        rename = "collectionFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_format: Option<CollectionFormat>,
}

impl Parameter {
    /// Creates an optional parameter with no format.
    pub fn new(name: impl Into<String>, location: ParamLocation, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            location,
            param_type,
            format: None,
            items: None,
            collection_format: None,
            required: false,
            default: None,
            description: None,
        }
    }

    /// Sets the format modifier.
    pub fn with_format(mut self, format: ParamFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the array item schema.
    pub fn with_items(mut self, items: Items) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Sets the array serialization.
    pub fn with_collection_format(mut self, collection_format: CollectionFormat) -> Self {
        self.collection_format = Some(collection_format);
        self
    }

    /// Sets whether the parameter must be present.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the value used when the parameter is absent.
    pub fn with_default(mut self, default: JsonValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Parses a single parameter object from YAML.
    pub fn from_yaml_str(yaml: &str) -> ParamResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a single parameter object from JSON.
    pub fn from_json_str(json: &str) -> ParamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parses a YAML sequence of parameter objects (e.g. an operation's `parameters` block).
pub fn parse_parameters_yaml(yaml: &str) -> ParamResult<Vec<Parameter>> {
    Ok(serde_yaml::from_str(yaml)?)
}

impl Items {
    /// Creates an item schema of the given type.
    pub fn new(item_type: ParamType) -> Self {
        Self {
            item_type,
            format: None,
            items: None,
            collection_format: None,
        }
    }

    /// Sets the item format.
    pub fn with_format(mut self, format: ParamFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the nested item schema and its serialization.
    pub fn with_items(mut self, items: Items, collection_format: CollectionFormat) -> Self {
        self.items = Some(Box::new(items));
        self.collection_format = Some(collection_format);
        self
    }
}

impl TypeSpec for Parameter {
    fn param_type(&self) -> ParamType {
        self.param_type
    }

    fn format(&self) -> Option<ParamFormat> {
        self.format.clone()
    }

    fn collection_format(&self) -> Option<CollectionFormat> {
        self.collection_format
    }

    fn items(&self) -> Option<&dyn TypeSpec> {
        self.items.as_deref().map(|i| i as &dyn TypeSpec)
    }
}

impl ParameterDescriptor for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> ParamLocation {
        self.location
    }

    fn required(&self) -> bool {
        self.required || self.location == ParamLocation::Path
    }

    fn default_value(&self) -> Option<&JsonValue> {
        self.default.as_ref()
    }
}

impl TypeSpec for Items {
    fn param_type(&self) -> ParamType {
        self.item_type
    }

    fn format(&self) -> Option<ParamFormat> {
        self.format.clone()
    }

    fn collection_format(&self) -> Option<CollectionFormat> {
        self.collection_format
    }

    fn items(&self) -> Option<&dyn TypeSpec> {
        self.items.as_deref().map(|i| i as &dyn TypeSpec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_swagger_query_parameter() {
        let yaml = r#"
name: limit
in: query
type: integer
format: int32
required: true
"#;
        let param = Parameter::from_yaml_str(yaml).unwrap();
        assert_eq!(param.name(), "limit");
        assert_eq!(param.location(), ParamLocation::Query);
        assert_eq!(param.param_type(), ParamType::Integer);
        assert_eq!(TypeSpec::format(&param), Some(ParamFormat::Int32));
        assert!(ParameterDescriptor::required(&param));
    }

    #[test]
    fn test_parse_array_parameter_with_items() {
        let json = r#"{
            "name": "ids",
            "in": "query",
            "type": "array",
            "collectionFormat": "pipes",
            "items": {"type": "integer"}
        }"#;
        let param = Parameter::from_json_str(json).unwrap();
        assert_eq!(param.collection_format(), Some(CollectionFormat::Pipes));
        let items = TypeSpec::items(&param).unwrap();
        assert_eq!(items.param_type(), ParamType::Integer);
        assert!(items.items().is_none());
    }

    #[test]
    fn test_body_parameter_without_type_defaults_to_string() {
        let yaml = r#"
name: payload
in: body
schema:
  type: object
"#;
        let param = Parameter::from_yaml_str(yaml).unwrap();
        assert_eq!(param.param_type(), ParamType::String);
        assert_eq!(param.location(), ParamLocation::Body);
    }

    #[test]
    fn test_unknown_location_fails_to_parse() {
        let yaml = "name: x\nin: matrix\ntype: string\n";
        assert!(Parameter::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_path_parameters_are_always_required() {
        let param = Parameter::new("id", ParamLocation::Path, ParamType::Integer);
        assert!(!param.required);
        assert!(ParameterDescriptor::required(&param));
    }

    #[test]
    fn test_parse_parameter_list() {
        let yaml = r#"
- name: parrot_status
  in: query
  type: string
  default: resting
- name: X-Request-Id
  in: header
  type: string
"#;
        let params = parse_parameters_yaml(yaml).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].default_value(), Some(&json!("resting")));
        assert_eq!(params[1].location(), ParamLocation::Header);
    }
}
