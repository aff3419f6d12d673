//! # `http::Request` Adapter
//!
//! Exposes an `http::Request<serde_json::Value>` through [`RequestAccessor`].
//!
//! The query string, headers and `Cookie` headers are decoded once, when the
//! adapter is built. Header bytes outside visible ASCII are decoded as lossy
//! UTF-8. Path parameters come from whatever router matched the request.
//! A string body is treated as a urlencoded form; an object body provides
//! `body` fields (and `formData` fields when no urlencoded form is present).

use super::{raw_from_values, RawValue, RequestAccessor};
use crate::descriptor::ParamLocation;
use ::http::header::COOKIE;
use ::http::Request;
use cookie::Cookie;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use url::form_urlencoded;

/// A borrowed `http::Request` with its collections decoded.
#[derive(Debug)]
pub struct HttpRequest<'r> {
    request: &'r Request<JsonValue>,
    path: IndexMap<String, String>,
    query: IndexMap<String, Vec<String>>,
    headers: IndexMap<String, Vec<String>>,
    cookies: IndexMap<String, String>,
    form: IndexMap<String, Vec<String>>,
}

impl<'r> HttpRequest<'r> {
    /// Decodes the query string, headers, cookies and form body of `request`.
    pub fn new(request: &'r Request<JsonValue>) -> Self {
        let query = request
            .uri()
            .query()
            .map(|q| decode_urlencoded(q.as_bytes()))
            .unwrap_or_default();
        let form = match request.body() {
            JsonValue::String(body) => decode_urlencoded(body.as_bytes()),
            _ => IndexMap::new(),
        };

        Self {
            request,
            path: IndexMap::new(),
            query,
            headers: decode_headers(request),
            cookies: parse_cookies(request),
            form,
        }
    }

    /// Adds the path parameters extracted by the router.
    pub fn with_path_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.path
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The wrapped request.
    pub fn inner(&self) -> &'r Request<JsonValue> {
        self.request
    }

    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|v| raw_from_values(v))
    }

    fn body_field(&self, name: &str) -> Option<RawValue<'_>> {
        match self.request.body() {
            JsonValue::Object(map) => map.get(name).map(RawValue::Json),
            _ => None,
        }
    }
}

impl RequestAccessor for HttpRequest<'_> {
    fn lookup(&self, location: ParamLocation, name: &str) -> Option<RawValue<'_>> {
        match location {
            ParamLocation::Query => self.query.get(name).and_then(|v| raw_from_values(v)),
            ParamLocation::Path => self.path.get(name).map(|v| RawValue::Text(v)),
            ParamLocation::Header => self.header(name),
            ParamLocation::Cookie => self.cookies.get(name).map(|v| RawValue::Text(v)),
            ParamLocation::Body => self.body_field(name),
            ParamLocation::FormData => match self.form.get(name) {
                Some(values) => raw_from_values(values),
                None => self.body_field(name),
            },
        }
    }
}

fn decode_urlencoded(input: &[u8]) -> IndexMap<String, Vec<String>> {
    let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, value) in form_urlencoded::parse(input) {
        map.entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    map
}

/// Header names are already lowercase in a `HeaderMap`.
fn decode_headers(request: &Request<JsonValue>) -> IndexMap<String, Vec<String>> {
    let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, value) in request.headers() {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}

/// Collects cookies from every `Cookie` header, percent-decoded and with
/// surrounding quotes trimmed. The first occurrence of a name wins.
fn parse_cookies(request: &Request<JsonValue>) -> IndexMap<String, String> {
    let mut cookies = IndexMap::new();
    for header in request.headers().get_all(COOKIE) {
        let header = String::from_utf8_lossy(header.as_bytes());
        for cookie in Cookie::split_parse_encoded(header).flatten() {
            cookies
                .entry(cookie.name().to_string())
                .or_insert_with(|| cookie.value_trimmed().to_string());
        }
    }
    cookies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value_of_param, ParamError, ParamType, ParamValue, Parameter};
    use ::http::HeaderValue;
    use serde_json::json;

    fn request(uri: &str, body: JsonValue) -> Request<JsonValue> {
        Request::builder()
            .uri(uri)
            .header("X-Request-Id", "abc")
            .header("Cookie", "session=s%201; theme=\"dark\"")
            .header("Cookie", "session=ignored")
            .body(body)
            .unwrap()
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let req = request("/parrots?status=pining%20for%20the%20fjords&limit=10", json!(null));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Query, "status"),
            Some(RawValue::Text("pining for the fjords"))
        );
        assert_eq!(
            adapter.lookup(ParamLocation::Query, "limit"),
            Some(RawValue::Text("10"))
        );
        assert_eq!(adapter.lookup(ParamLocation::Query, "missing"), None);
    }

    #[test]
    fn test_repeated_query_keys_are_kept() {
        let req = request("/parrots?tag=a&tag=b", json!(null));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Query, "tag"),
            Some(RawValue::Multi(vec!["a", "b"]))
        );
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = request("/", json!(null));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Header, "x-request-id"),
            Some(RawValue::Text("abc"))
        );
    }

    #[test]
    fn test_non_ascii_header_is_present() {
        let req = Request::builder()
            .uri("/")
            .header("X-Name", HeaderValue::from_bytes("José".as_bytes()).unwrap())
            .body(json!(null))
            .unwrap();
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Header, "X-Name"),
            Some(RawValue::Text("José"))
        );

        let name = Parameter::new("X-Name", ParamLocation::Header, ParamType::String);
        assert_eq!(value_of_param(&name, &adapter).unwrap(), ParamValue::from("José"));
        let age = Parameter::new("X-Name", ParamLocation::Header, ParamType::Integer);
        assert!(matches!(
            value_of_param(&age, &adapter),
            Err(ParamError::InvalidParameterType { .. })
        ));
    }

    #[test]
    fn test_repeated_header_lines() {
        let req = Request::builder()
            .uri("/")
            .header("X-Ratio", "0.5")
            .header("X-Ratio", "0.75")
            .body(json!(null))
            .unwrap();
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Header, "x-ratio"),
            Some(RawValue::Multi(vec!["0.5", "0.75"]))
        );

        let ratio = Parameter::new("X-Ratio", ParamLocation::Header, ParamType::Number);
        assert_eq!(value_of_param(&ratio, &adapter).unwrap(), ParamValue::Number(0.75));
    }

    #[test]
    fn test_cookies() {
        let req = request("/", json!(null));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Cookie, "session"),
            Some(RawValue::Text("s 1"))
        );
        assert_eq!(
            adapter.lookup(ParamLocation::Cookie, "theme"),
            Some(RawValue::Text("dark"))
        );
    }

    #[test]
    fn test_malformed_cookie_pairs_are_skipped() {
        let req = Request::builder()
            .uri("/")
            .header("Cookie", "=orphan; remember_me=yes; broken")
            .body(json!(null))
            .unwrap();
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Cookie, "remember_me"),
            Some(RawValue::Text("yes"))
        );
        assert_eq!(adapter.lookup(ParamLocation::Cookie, "broken"), None);
    }

    #[test]
    fn test_path_params_from_router() {
        let req = request("/parrots/42", json!(null));
        let adapter = HttpRequest::new(&req).with_path_params([("id", "42")]);
        assert_eq!(adapter.lookup(ParamLocation::Path, "id"), Some(RawValue::Text("42")));
    }

    #[test]
    fn test_json_body_fields() {
        let req = request("/", json!({"count": 3, "name": "polly"}));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::Body, "count"),
            Some(RawValue::Json(&json!(3)))
        );
        // Object bodies double as form data.
        assert_eq!(
            adapter.lookup(ParamLocation::FormData, "name"),
            Some(RawValue::Json(&json!("polly")))
        );
    }

    #[test]
    fn test_urlencoded_form_body() {
        let req = request("/", json!("name=polly&age=3"));
        let adapter = HttpRequest::new(&req);
        assert_eq!(
            adapter.lookup(ParamLocation::FormData, "age"),
            Some(RawValue::Text("3"))
        );
        assert_eq!(adapter.lookup(ParamLocation::Body, "age"), None);
    }
}
