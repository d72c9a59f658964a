//! Response shaping: turn a completed exchange (or a failure) into the payload returned to the
//! host.

use crate::error::{ErrorKind, HttpToolsError};
use crate::request::{BodyType, OutboundRequest, RequestArgs};
use crate::safety::{REDACTED, is_sensitive_header, redact_headers};
use base64::Engine as _;
use mime::Mime;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundResponse {
    pub status_code: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub content_type: Option<String>,
    /// Body text, or base64 when the bytes are not valid UTF-8.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<&'static str>,
    /// Parsed body, present only for JSON content types that parsed successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    pub elapsed_ms: f64,
    /// URL after redirects.
    pub final_url: String,
    pub truncated: bool,
}

impl InboundResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Decoded body plus its JSON form, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedBody {
    pub content: String,
    pub content_encoding: Option<&'static str>,
    pub json: Option<Value>,
}

/// Decode body bytes. Truncated bodies are never parsed as JSON.
#[must_use]
pub fn shape_body(bytes: &[u8], content_type: Option<&str>, truncated: bool) -> ShapedBody {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => Some(text),
        // The cut may have split a multi-byte character.
        Err(e) if truncated && e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()
        }
        Err(_) => None,
    };
    let Some(text) = text else {
        return ShapedBody {
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            content_encoding: Some("base64"),
            json: None,
        };
    };

    let json = if !truncated && is_json_content_type(content_type) {
        serde_json::from_str(text).ok()
    } else {
        None
    };

    ShapedBody {
        content: text.to_string(),
        content_encoding: None,
        json,
    }
}

/// `application/json` and any `+json` structured syntax suffix.
#[must_use]
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let Ok(m) = ct.parse::<Mime>() else {
        return false;
    };
    m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
}

/// Flatten a header map; repeated headers are joined with `, `.
#[must_use]
pub fn headers_to_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

/// What the caller asked for, echoed back with every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
}

impl RequestSummary {
    #[must_use]
    pub fn from_request(req: &OutboundRequest) -> Self {
        Self {
            method: req.method.as_str().to_string(),
            url: req.url.to_string(),
            headers: redact_headers(&req.headers),
            params: req.query.iter().cloned().collect(),
            body_type: req.body.as_ref().map(crate::request::RequestBody::body_type),
            timeout_secs: Some(req.timeout.as_secs_f64()),
        }
    }

    /// Best-effort echo for arguments that failed validation.
    #[must_use]
    pub fn from_args(args: &RequestArgs) -> Self {
        let flatten = |m: Option<&serde_json::Map<String, Value>>,
                       redact: bool|
         -> BTreeMap<String, String> {
            m.map(|m| {
                m.iter()
                    .map(|(k, v)| {
                        let v = if redact && is_sensitive_header(k) {
                            REDACTED.to_string()
                        } else {
                            v.as_str().map_or_else(|| v.to_string(), str::to_string)
                        };
                        (k.clone(), v)
                    })
                    .collect()
            })
            .unwrap_or_default()
        };

        Self {
            method: args
                .method
                .as_deref()
                .map_or_else(|| "GET".to_string(), |m| m.trim().to_ascii_uppercase()),
            url: args.url.clone().unwrap_or_default(),
            headers: flatten(args.headers.as_ref(), true),
            params: flatten(args.params.as_ref(), false),
            body_type: None,
            timeout_secs: args.timeout,
        }
    }
}

#[must_use]
pub fn success_payload(request: &RequestSummary, response: &InboundResponse) -> Value {
    json!({
        "success": response.is_success(),
        "request": request,
        "response": response,
    })
}

#[must_use]
pub fn error_payload(request: &RequestSummary, error: &HttpToolsError) -> Value {
    error_payload_with_kind(request, error.kind(), &error.to_string())
}

#[must_use]
pub fn error_payload_with_kind(request: &RequestSummary, kind: ErrorKind, message: &str) -> Value {
    json!({
        "success": false,
        "error": {
            "kind": kind,
            "message": message,
        },
        "request": request,
    })
}
