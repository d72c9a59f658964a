//! Boundary validation: loosely-typed tool arguments into a strict [`OutboundRequest`].
//!
//! Every decision about the outbound exchange (verb, URL, body representation, content type,
//! timeout, TLS and redirect behavior) is made here, once. The runtime only executes what this
//! module produced.

use crate::config::{MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use crate::error::{HttpToolsError, Result};
use crate::safety::parse_target_url;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    #[must_use]
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = HttpToolsError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| HttpToolsError::InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the caller wants `body` encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    Json,
    Form,
    Text,
    Raw,
}

impl FromStr for BodyType {
    type Err = HttpToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "form" => Ok(Self::Form),
            "text" => Ok(Self::Text),
            "raw" => Ok(Self::Raw),
            _ => Err(HttpToolsError::InvalidBody(format!(
                "invalid body type '{s}': must be one of json, form, text, raw"
            ))),
        }
    }
}

/// The single body representation chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Serialized JSON document.
    Json(String),
    /// `application/x-www-form-urlencoded` payload.
    Form(String),
    Text(String),
    /// Sent verbatim, no content type injected.
    Raw(String),
}

impl RequestBody {
    #[must_use]
    pub fn body_type(&self) -> BodyType {
        match self {
            Self::Json(_) => BodyType::Json,
            Self::Form(_) => BodyType::Form,
            Self::Text(_) => BodyType::Text,
            Self::Raw(_) => BodyType::Raw,
        }
    }

    #[must_use]
    pub fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
            Self::Form(_) => Some(FORM_CONTENT_TYPE),
            Self::Text(_) => Some(TEXT_CONTENT_TYPE),
            Self::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json(s) | Self::Form(s) | Self::Text(s) | Self::Raw(s) => s,
        }
    }

    /// Pick the representation for `body` according to `body_type`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBody` for a JSON string that does not parse, or a form body that is neither
    /// an object nor a pre-encoded string.
    pub fn from_value(body_type: BodyType, body: Value) -> Result<Self> {
        match body_type {
            BodyType::Json => match body {
                Value::String(s) => {
                    serde_json::from_str::<Value>(&s).map_err(|e| {
                        HttpToolsError::InvalidBody(format!("invalid JSON body provided: {e}"))
                    })?;
                    Ok(Self::Json(s))
                }
                other => serde_json::to_string(&other)
                    .map(Self::Json)
                    .map_err(|e| HttpToolsError::InvalidBody(e.to_string())),
            },
            BodyType::Form => match body {
                Value::String(s) => Ok(Self::Form(s)),
                Value::Object(map) => Ok(Self::Form(encode_form(&map))),
                other => Err(HttpToolsError::InvalidBody(format!(
                    "form body must be an object or a pre-encoded string, got {}",
                    json_type_name(&other)
                ))),
            },
            BodyType::Text => Ok(Self::Text(value_to_string(&body))),
            BodyType::Raw => Ok(Self::Raw(value_to_string(&body))),
        }
    }
}

/// Tool arguments as supplied by the host, before validation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RequestArgs {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<Map<String, Value>>,
    #[serde(default, alias = "query")]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub body_type: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub follow_redirects: Option<bool>,
    #[serde(default, alias = "verify_tls")]
    pub verify_ssl: Option<bool>,
}

impl RequestArgs {
    /// Deserialize tool arguments. `null` is treated as an empty argument object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the payload is not an object or a field has the wrong type.
    pub fn from_value(arguments: Value) -> Result<Self> {
        if arguments.is_null() {
            return Ok(Self::default());
        }
        if !arguments.is_object() {
            return Err(HttpToolsError::InvalidArgument(format!(
                "tool arguments must be an object, got {}",
                json_type_name(&arguments)
            )));
        }
        serde_json::from_value(arguments)
            .map_err(|e| HttpToolsError::InvalidArgument(e.to_string()))
    }
}

/// A fully validated HTTP exchange, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Caller headers, plus the default content type when one applies.
    pub headers: Vec<(String, String)>,
    /// Appended to any query string already present in `url`.
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub follow_redirects: bool,
}

impl OutboundRequest {
    /// Validate `args` into a request. Checks run in a fixed order (method, URL, timeout, headers,
    /// query, body) so the reported error is the first problem found.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMethod`, `InvalidUrl`, `InvalidArgument` or `InvalidBody`.
    pub fn from_args(args: RequestArgs, default_timeout_secs: f64) -> Result<Self> {
        let method = match args.method.as_deref() {
            Some(m) => m.parse()?,
            None => HttpMethod::Get,
        };

        let raw_url = args
            .url
            .ok_or_else(|| HttpToolsError::InvalidUrl("missing required field 'url'".to_string()))?;
        let url = parse_target_url(&raw_url)?;

        let timeout = parse_timeout(args.timeout.unwrap_or(default_timeout_secs))?;

        let mut headers = string_pairs("headers", args.headers)?;
        for (name, value) in &headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                HttpToolsError::InvalidArgument(format!("invalid header name '{name}'"))
            })?;
            HeaderValue::from_str(value).map_err(|_| {
                HttpToolsError::InvalidArgument(format!("invalid value for header '{name}'"))
            })?;
        }

        let query = string_pairs("params", args.params)?;

        let body_type = match args.body_type.as_deref() {
            Some(t) => t.parse()?,
            None => BodyType::default(),
        };
        let body = match args.body {
            None | Some(Value::Null) => None,
            Some(v) => Some(RequestBody::from_value(body_type, v)?),
        };

        if let Some(ct) = body.as_ref().and_then(RequestBody::default_content_type)
            && !headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
        {
            headers.push(("Content-Type".to_string(), ct.to_string()));
        }

        Ok(Self {
            method,
            url,
            headers,
            query,
            body,
            timeout,
            verify_tls: args.verify_ssl.unwrap_or(true),
            follow_redirects: args.follow_redirects.unwrap_or(true),
        })
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn parse_timeout(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(HttpToolsError::InvalidArgument(format!(
            "timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds, got {secs}"
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

fn string_pairs(field: &str, map: Option<Map<String, Value>>) -> Result<Vec<(String, String)>> {
    let Some(map) = map else {
        return Ok(Vec::new());
    };
    map.into_iter()
        .map(|(k, v)| match v {
            Value::Array(_) | Value::Object(_) => Err(HttpToolsError::InvalidArgument(format!(
                "{field}.{k} must be a string, number or boolean"
            ))),
            other => Ok((k, value_to_string(&other))),
        })
        .collect()
}

fn encode_form(map: &Map<String, Value>) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in map {
        ser.append_pair(k, &value_to_string(v));
    }
    ser.finish()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn build(args: Value) -> Result<OutboundRequest> {
        OutboundRequest::from_args(RequestArgs::from_value(args)?, 30.0)
    }

    #[test]
    fn method_is_case_insensitive_and_defaults_to_get() {
        let req = build(json!({"url": "https://example.com", "method": " patch "})).expect("valid");
        assert_eq!(req.method, HttpMethod::Patch);

        let req = build(json!({"url": "https://example.com"})).expect("valid");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.timeout, Duration::from_secs(30));
        assert!(req.verify_tls);
        assert!(req.follow_redirects);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = build(json!({"url": "https://example.com", "method": "FETCH"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMethod);
    }

    #[test]
    fn malformed_urls_are_invalid_url() {
        for url in ["", "example.com", "mailto:someone@example.com"] {
            let err = build(json!({ "url": url })).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUrl, "url: {url:?}");
        }
        let err = build(json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    }

    #[test]
    fn json_object_body_sets_content_type_and_round_trips() {
        let payload = json!({"name": "Ada", "tags": ["x", "y"], "n": 3});
        let req = build(json!({
            "url": "https://example.com",
            "method": "POST",
            "body": payload,
        }))
        .expect("valid");

        assert_eq!(req.header("content-type"), Some(JSON_CONTENT_TYPE));
        let Some(RequestBody::Json(sent)) = &req.body else {
            panic!("expected json body, got {:?}", req.body);
        };
        let decoded: Value = serde_json::from_str(sent).expect("sent body is json");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn explicit_content_type_is_not_overridden() {
        let req = build(json!({
            "url": "https://example.com",
            "method": "POST",
            "headers": {"content-type": "application/vnd.api+json"},
            "body": {"a": 1},
        }))
        .expect("valid");
        assert_eq!(req.header("Content-Type"), Some("application/vnd.api+json"));
        assert_eq!(
            req.headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .count(),
            1
        );
    }

    #[test]
    fn json_string_body_must_parse() {
        let req = build(json!({"url": "https://example.com", "body": "{\"a\": 1}"})).expect("valid");
        assert_eq!(req.body, Some(RequestBody::Json("{\"a\": 1}".to_string())));

        let err = build(json!({"url": "https://example.com", "body": "{not json"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBody);
    }

    #[test]
    fn form_body_is_url_encoded() {
        let req = build(json!({
            "url": "https://example.com",
            "method": "POST",
            "body_type": "FORM",
            "body": {"q": "a b&c", "n": 2},
        }))
        .expect("valid");
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        let Some(RequestBody::Form(encoded)) = &req.body else {
            panic!("expected form body");
        };
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        assert!(pairs.contains(&("q".to_string(), "a b&c".to_string())));
        assert!(pairs.contains(&("n".to_string(), "2".to_string())));

        let err = build(json!({"url": "https://example.com", "body_type": "form", "body": [1]}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBody);
    }

    #[test]
    fn text_and_raw_bodies() {
        let req = build(json!({"url": "https://example.com", "body_type": "text", "body": "hi"}))
            .expect("valid");
        assert_eq!(req.body, Some(RequestBody::Text("hi".to_string())));
        assert_eq!(req.header("content-type"), Some(TEXT_CONTENT_TYPE));

        let req = build(json!({"url": "https://example.com", "body_type": "raw", "body": "<x/>"}))
            .expect("valid");
        assert_eq!(req.body, Some(RequestBody::Raw("<x/>".to_string())));
        assert_eq!(req.header("content-type"), None);

        let err = build(json!({"url": "https://example.com", "body_type": "xml", "body": "<x/>"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBody);
    }

    #[test]
    fn null_body_is_absent() {
        let req = build(json!({"url": "https://example.com", "body": null})).expect("valid");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn timeout_bounds() {
        let req = build(json!({"url": "https://example.com", "timeout": 0.5})).expect("valid");
        assert_eq!(req.timeout, Duration::from_millis(500));

        for t in [0.0, 0.05, 301.0, -1.0] {
            let err = build(json!({"url": "https://example.com", "timeout": t})).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "timeout: {t}");
        }
    }

    #[test]
    fn headers_and_params_accept_scalars_only() {
        let req = build(json!({
            "url": "https://example.com",
            "headers": {"X-Count": 3, "X-Flag": true},
            "params": {"page": 2, "q": "rust"},
        }))
        .expect("valid");
        assert_eq!(req.header("x-count"), Some("3"));
        assert_eq!(req.header("x-flag"), Some("true"));
        assert!(req.query.contains(&("page".to_string(), "2".to_string())));

        let err = build(json!({"url": "https://example.com", "headers": {"X": {"a": 1}}}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = build(json!({"url": "https://example.com", "headers": {"bad header": "v"}}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = RequestArgs::from_value(json!("https://example.com")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            RequestArgs::from_value(Value::Null).expect("null"),
            RequestArgs::default()
        );
    }

    #[test]
    fn verify_and_redirect_flags_are_honored() {
        let req = build(json!({
            "url": "https://example.com",
            "verify_tls": false,
            "follow_redirects": false,
        }))
        .expect("valid");
        assert!(!req.verify_tls);
        assert!(!req.follow_redirects);
    }
}
