//! # Coercion
//!
//! Converts raw request values into [`ParamValue`]s according to a [`TypeSpec`].
//!
//! Text is parsed; JSON body values already of the declared type are taken
//! as they are, JSON strings are parsed like text. Arrays are split by their
//! collection format and every item is coerced against the item schema,
//! recursively for nested arrays.

use crate::config::ResolverConfig;
use crate::descriptor::{CollectionFormat, ParamFormat, ParamType, TypeSpec};
use crate::error::{ParamError, ParamResult};
use crate::request::RawValue;
use crate::value::ParamValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

/// Naive date-time layouts accepted for `date-time`, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Coerces `raw` to the type declared by `spec`.
///
/// `name` is only used for error reporting.
pub fn coerce(
    name: &str,
    spec: &dyn TypeSpec,
    raw: RawValue<'_>,
    config: &ResolverConfig,
) -> ParamResult<ParamValue> {
    match raw {
        RawValue::Text(text) => coerce_text(name, spec, text, config),
        RawValue::Json(value) => coerce_json(name, spec, value, config),
        RawValue::Multi(values) => coerce_multi(name, spec, &values, config),
    }
}

/// Human readable description of what `spec` accepts.
pub fn expected(spec: &dyn TypeSpec) -> &'static str {
    match (spec.param_type(), spec.format()) {
        (ParamType::String, Some(ParamFormat::Date)) => "a date",
        (ParamType::String, Some(ParamFormat::DateTime)) => "a datetime",
        (ParamType::String, _) => "a string",
        (ParamType::Integer, Some(ParamFormat::Int32)) => "a 32-bit integer",
        (ParamType::Integer, _) => "an integer",
        (ParamType::Number, _) => "a floating point number",
        (ParamType::Boolean, _) => "a boolean",
        (ParamType::Array, _) => "an array",
    }
}

fn coerce_text(
    name: &str,
    spec: &dyn TypeSpec,
    raw: &str,
    config: &ResolverConfig,
) -> ParamResult<ParamValue> {
    let text = if config.trim_whitespace { raw.trim() } else { raw };
    let invalid = || ParamError::invalid_type(name, raw, expected(spec));

    match spec.param_type() {
        ParamType::String => match spec.format() {
            Some(ParamFormat::Date) => parse_date(text)
                .map(ParamValue::DateTime)
                .ok_or_else(invalid),
            Some(ParamFormat::DateTime) => parse_datetime(text)
                .map(ParamValue::DateTime)
                .ok_or_else(invalid),
            // Plain strings are returned untouched, whitespace included.
            _ => Ok(ParamValue::String(raw.to_string())),
        },
        ParamType::Integer => {
            let value = text.parse::<i64>().map_err(|_| invalid())?;
            check_integer(name, spec, raw, value)
        }
        ParamType::Number => text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ParamValue::Number)
            .ok_or_else(invalid),
        ParamType::Boolean => config
            .boolean
            .parse(text)
            .map(ParamValue::Boolean)
            .ok_or_else(invalid),
        ParamType::Array => {
            let items: Vec<&str> = match collection_format(name, spec, config)?.separator() {
                Some(sep) => raw.split(sep).collect(),
                None => vec![raw],
            };
            coerce_items(name, spec, &items, config)
        }
    }
}

fn coerce_multi(
    name: &str,
    spec: &dyn TypeSpec,
    values: &[&str],
    config: &ResolverConfig,
) -> ParamResult<ParamValue> {
    if spec.param_type() == ParamType::Array
        && collection_format(name, spec, config)? == CollectionFormat::Multi
    {
        return coerce_items(name, spec, values, config);
    }
    // A repeated key for anything else: the last occurrence wins.
    match values.last() {
        Some(last) => coerce_text(name, spec, last, config),
        None => Err(ParamError::invalid_type(name, "", expected(spec))),
    }
}

fn coerce_json(
    name: &str,
    spec: &dyn TypeSpec,
    value: &JsonValue,
    config: &ResolverConfig,
) -> ParamResult<ParamValue> {
    let invalid = || {
        ParamError::invalid_type(name, RawValue::Json(value).describe(), expected(spec))
    };

    match (spec.param_type(), value) {
        (_, JsonValue::String(text)) => coerce_text(name, spec, text, config),
        (ParamType::Integer, JsonValue::Number(n)) => {
            let value = n.as_i64().ok_or_else(invalid)?;
            check_integer(name, spec, &n.to_string(), value)
        }
        (ParamType::Number, JsonValue::Number(n)) => {
            n.as_f64().map(ParamValue::Number).ok_or_else(invalid)
        }
        (ParamType::Boolean, JsonValue::Bool(b)) => Ok(ParamValue::Boolean(*b)),
        (ParamType::Array, JsonValue::Array(elements)) => {
            let items = item_spec(name, spec)?;
            elements
                .iter()
                .map(|element| coerce_json(name, items, element, config))
                .collect::<ParamResult<Vec<_>>>()
                .map(ParamValue::Array)
        }
        _ => Err(invalid()),
    }
}

fn coerce_items(
    name: &str,
    spec: &dyn TypeSpec,
    items: &[&str],
    config: &ResolverConfig,
) -> ParamResult<ParamValue> {
    let item_spec = item_spec(name, spec)?;
    items
        .iter()
        .map(|item| coerce_text(name, item_spec, item, config))
        .collect::<ParamResult<Vec<_>>>()
        .map(ParamValue::Array)
}

fn item_spec<'s>(name: &str, spec: &'s dyn TypeSpec) -> ParamResult<&'s dyn TypeSpec> {
    spec.items().ok_or_else(|| {
        ParamError::definition(format!(
            "Array parameter '{}' has not defined the type of its items",
            name
        ))
    })
}

fn collection_format(
    name: &str,
    spec: &dyn TypeSpec,
    config: &ResolverConfig,
) -> ParamResult<CollectionFormat> {
    spec.collection_format()
        .or(config.default_collection_format)
        .ok_or_else(|| {
            ParamError::definition(format!(
                "Array parameter '{}' collection format not defined",
                name
            ))
        })
}

fn check_integer(
    name: &str,
    spec: &dyn TypeSpec,
    raw: &str,
    value: i64,
) -> ParamResult<ParamValue> {
    if spec.format() == Some(ParamFormat::Int32) && i32::try_from(value).is_err() {
        return Err(ParamError::invalid_type(name, raw, expected(spec)));
    }
    Ok(ParamValue::Integer(value))
}

/// Parses a full-date (`2019-03-01`) as midnight UTC.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// Parses RFC 3339, falling back to naive layouts read as UTC.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Items, ParamLocation, Parameter};
    use chrono::TimeZone;
    use serde_json::json;

    fn text(spec: &Parameter, raw: &str) -> ParamResult<ParamValue> {
        coerce(&spec.name, spec, RawValue::Text(raw), &ResolverConfig::default())
    }

    fn query(name: &str, ty: ParamType) -> Parameter {
        Parameter::new(name, ParamLocation::Query, ty)
    }

    #[test]
    fn test_string_is_returned_verbatim() {
        let spec = query("parrot_status", ParamType::String);
        assert_eq!(text(&spec, " dead ").unwrap(), ParamValue::from(" dead "));
    }

    #[test]
    fn test_integer() {
        let spec = query("limit", ParamType::Integer);
        assert_eq!(text(&spec, "10").unwrap(), ParamValue::Integer(10));
        assert_eq!(text(&spec, " -3 ").unwrap(), ParamValue::Integer(-3));
        let err = text(&spec, "abc").unwrap_err();
        match err {
            ParamError::InvalidParameterType { name, value, expected } => {
                assert_eq!(name, "limit");
                assert_eq!(value, "abc");
                assert_eq!(expected, "an integer");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(text(&spec, "1.5").is_err());
    }

    #[test]
    fn test_int32_range() {
        let spec = query("page", ParamType::Integer).with_format(ParamFormat::Int32);
        assert_eq!(text(&spec, "2147483647").unwrap(), ParamValue::Integer(i32::MAX as i64));
        assert!(text(&spec, "2147483648").is_err());
    }

    #[test]
    fn test_number() {
        let spec = query("ratio", ParamType::Number);
        assert_eq!(text(&spec, "0.25").unwrap(), ParamValue::Number(0.25));
        assert_eq!(text(&spec, "4").unwrap(), ParamValue::Number(4.0));
        assert!(text(&spec, "NaN").is_err());
        assert!(text(&spec, "inf").is_err());
        assert!(text(&spec, "quarter").is_err());
    }

    #[test]
    fn test_boolean_vocabulary() {
        let spec = query("verbose", ParamType::Boolean);
        for raw in ["true", "True", "1", "yes", "on"] {
            assert_eq!(text(&spec, raw).unwrap(), ParamValue::Boolean(true), "{raw}");
        }
        for raw in ["false", "0", "NO", "off"] {
            assert_eq!(text(&spec, raw).unwrap(), ParamValue::Boolean(false), "{raw}");
        }
        assert!(text(&spec, "maybe").is_err());
    }

    #[test]
    fn test_trimming_can_be_disabled() {
        let spec = query("limit", ParamType::Integer);
        let config = ResolverConfig {
            trim_whitespace: false,
            ..ResolverConfig::default()
        };
        assert!(coerce("limit", &spec, RawValue::Text(" 10"), &config).is_err());
    }

    #[test]
    fn test_date_format() {
        let spec = query("since", ParamType::String).with_format(ParamFormat::Date);
        assert_eq!(
            text(&spec, "2019-03-01").unwrap(),
            ParamValue::DateTime(Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap())
        );
        let err = text(&spec, "01/03/2019").unwrap_err();
        assert!(err.to_string().contains("must be a date"));
    }

    #[test]
    fn test_datetime_format() {
        let spec = query("until", ParamType::String).with_format(ParamFormat::DateTime);
        assert_eq!(
            text(&spec, "2019-03-01T10:30:00+10:00").unwrap(),
            ParamValue::DateTime(Utc.with_ymd_and_hms(2019, 3, 1, 0, 30, 0).unwrap())
        );
        assert_eq!(
            text(&spec, "2019-03-01 10:30:00").unwrap(),
            ParamValue::DateTime(Utc.with_ymd_and_hms(2019, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            text(&spec, "2019-03-01T10:30").unwrap(),
            ParamValue::DateTime(Utc.with_ymd_and_hms(2019, 3, 1, 10, 30, 0).unwrap())
        );
        assert!(text(&spec, "yesterday").is_err());
    }

    #[test]
    fn test_unknown_format_is_ignored() {
        let spec = query("id", ParamType::String).with_format(ParamFormat::Other("uuid".into()));
        assert_eq!(text(&spec, "not-a-uuid").unwrap(), ParamValue::from("not-a-uuid"));
    }

    #[test]
    fn test_csv_array() {
        let spec = query("ids", ParamType::Array)
            .with_collection_format(CollectionFormat::Csv)
            .with_items(Items::new(ParamType::Integer));
        assert_eq!(text(&spec, "1,2,3").unwrap(), ParamValue::from(vec![1i64, 2, 3]));
        assert!(text(&spec, "1,x").is_err());
    }

    #[test]
    fn test_separators() {
        for (format, raw) in [
            (CollectionFormat::Ssv, "a b"),
            (CollectionFormat::Tsv, "a\tb"),
            (CollectionFormat::Pipes, "a|b"),
        ] {
            let spec = query("tags", ParamType::Array)
                .with_collection_format(format)
                .with_items(Items::new(ParamType::String));
            assert_eq!(text(&spec, raw).unwrap(), ParamValue::from(vec!["a", "b"]));
        }
    }

    #[test]
    fn test_nested_arrays() {
        let spec = query("grid", ParamType::Array)
            .with_collection_format(CollectionFormat::Pipes)
            .with_items(
                Items::new(ParamType::Array)
                    .with_items(Items::new(ParamType::Integer), CollectionFormat::Csv),
            );
        assert_eq!(
            text(&spec, "1,2|3").unwrap(),
            ParamValue::from(vec![vec![1i64, 2], vec![3]])
        );
    }

    #[test]
    fn test_multi_array_uses_repeated_keys() {
        let spec = query("tag", ParamType::Array)
            .with_collection_format(CollectionFormat::Multi)
            .with_items(Items::new(ParamType::String));
        let config = ResolverConfig::default();
        assert_eq!(
            coerce("tag", &spec, RawValue::Multi(vec!["a,b", "c"]), &config).unwrap(),
            ParamValue::from(vec!["a,b", "c"])
        );
        assert_eq!(text(&spec, "a,b").unwrap(), ParamValue::from(vec!["a,b"]));
    }

    #[test]
    fn test_repeated_scalar_takes_last() {
        let spec = query("limit", ParamType::Integer);
        let config = ResolverConfig::default();
        assert_eq!(
            coerce("limit", &spec, RawValue::Multi(vec!["1", "2"]), &config).unwrap(),
            ParamValue::Integer(2)
        );
    }

    #[test]
    fn test_array_definition_errors() {
        let no_items = query("ids", ParamType::Array).with_collection_format(CollectionFormat::Csv);
        assert!(matches!(
            text(&no_items, "1").unwrap_err(),
            ParamError::InvalidParameterDefinition(_)
        ));

        let no_format = query("ids", ParamType::Array).with_items(Items::new(ParamType::Integer));
        assert!(matches!(
            text(&no_format, "1").unwrap_err(),
            ParamError::InvalidParameterDefinition(_)
        ));

        let config = ResolverConfig {
            default_collection_format: Some(CollectionFormat::Csv),
            ..ResolverConfig::default()
        };
        assert_eq!(
            coerce("ids", &no_format, RawValue::Text("1,2"), &config).unwrap(),
            ParamValue::from(vec![1i64, 2])
        );
    }

    #[test]
    fn test_json_values() {
        let config = ResolverConfig::default();
        let int = query("count", ParamType::Integer);
        assert_eq!(
            coerce("count", &int, RawValue::Json(&json!(3)), &config).unwrap(),
            ParamValue::Integer(3)
        );
        assert_eq!(
            coerce("count", &int, RawValue::Json(&json!("4")), &config).unwrap(),
            ParamValue::Integer(4)
        );
        assert!(coerce("count", &int, RawValue::Json(&json!(1.5)), &config).is_err());
        assert!(coerce("count", &int, RawValue::Json(&json!(true)), &config).is_err());

        let flag = query("flag", ParamType::Boolean);
        assert_eq!(
            coerce("flag", &flag, RawValue::Json(&json!(false)), &config).unwrap(),
            ParamValue::Boolean(false)
        );

        let string = query("name", ParamType::String);
        let err = coerce("name", &string, RawValue::Json(&json!({"a": 1})), &config).unwrap_err();
        assert!(matches!(err, ParamError::InvalidParameterType { .. }));
    }

    #[test]
    fn test_json_error_renders_the_body_value() {
        let config = ResolverConfig::default();
        let int = query("count", ParamType::Integer);
        let err = coerce("count", &int, RawValue::Json(&json!([1, 2])), &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The value '[1,2]' for the 'count' field must be an integer"
        );
        let err = coerce("count", &int, RawValue::Json(&json!("many")), &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The value 'many' for the 'count' field must be an integer"
        );
    }

    #[test]
    fn test_json_array() {
        let spec = query("ids", ParamType::Array).with_items(Items::new(ParamType::Number));
        let config = ResolverConfig::default();
        assert_eq!(
            coerce("ids", &spec, RawValue::Json(&json!([1, "2.5"])), &config).unwrap(),
            ParamValue::from(vec![1.0, 2.5])
        );
    }

    #[test]
    fn test_expected_descriptions() {
        assert_eq!(expected(&query("a", ParamType::Number)), "a floating point number");
        assert_eq!(
            expected(&query("a", ParamType::String).with_format(ParamFormat::DateTime)),
            "a datetime"
        );
    }
}
