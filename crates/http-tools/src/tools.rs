//! The tool catalog: names, descriptions, input schemas and the mapping from each tool's
//! arguments onto [`RequestArgs`].
//!
//! Convenience tools (`http_get`, `http_post`, ...) only pre-fill `method` and drop the fields
//! they do not advertise; everything else goes through the same validation as `http_request`.

use crate::error::Result;
use crate::request::{HttpMethod, RequestArgs};
use crate::semantics::{annotations_for_any_method, annotations_for_method};
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpTool {
    Request,
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpTool {
    pub const ALL: [Self; 8] = [
        Self::Request,
        Self::Get,
        Self::Head,
        Self::Options,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Request => "http_request",
            Self::Get => "http_get",
            Self::Head => "http_head",
            Self::Options => "http_options",
            Self::Post => "http_post",
            Self::Put => "http_put",
            Self::Patch => "http_patch",
            Self::Delete => "http_delete",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The wrapper tool for a method.
    #[must_use]
    pub fn for_method(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::Get,
            HttpMethod::Head => Self::Head,
            HttpMethod::Options => Self::Options,
            HttpMethod::Post => Self::Post,
            HttpMethod::Put => Self::Put,
            HttpMethod::Patch => Self::Patch,
            HttpMethod::Delete => Self::Delete,
        }
    }

    /// `None` for `http_request`, which takes the method from its arguments.
    #[must_use]
    pub fn fixed_method(self) -> Option<HttpMethod> {
        match self {
            Self::Request => None,
            Self::Get => Some(HttpMethod::Get),
            Self::Head => Some(HttpMethod::Head),
            Self::Options => Some(HttpMethod::Options),
            Self::Post => Some(HttpMethod::Post),
            Self::Put => Some(HttpMethod::Put),
            Self::Patch => Some(HttpMethod::Patch),
            Self::Delete => Some(HttpMethod::Delete),
        }
    }

    #[must_use]
    pub fn accepts_body(self) -> bool {
        !matches!(self, Self::Get | Self::Head | Self::Options)
    }

    fn title(self) -> &'static str {
        match self {
            Self::Request => "HTTP request",
            Self::Get => "HTTP GET",
            Self::Head => "HTTP HEAD",
            Self::Options => "HTTP OPTIONS",
            Self::Post => "HTTP POST",
            Self::Put => "HTTP PUT",
            Self::Patch => "HTTP PATCH",
            Self::Delete => "HTTP DELETE",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Request => {
                "Make an HTTP request to any URL with full control over method, headers, query \
                 parameters, body, timeout, redirects and TLS verification. Returns status, \
                 headers, body text (plus parsed JSON for JSON responses), elapsed time and the \
                 final URL."
            }
            Self::Get => "Make a GET request (convenience wrapper around http_request).",
            Self::Head => {
                "Make a HEAD request to fetch status and headers only (convenience wrapper \
                 around http_request)."
            }
            Self::Options => {
                "Make an OPTIONS request to discover allowed methods and CORS policy \
                 (convenience wrapper around http_request)."
            }
            Self::Post => "Make a POST request (convenience wrapper around http_request).",
            Self::Put => "Make a PUT request (convenience wrapper around http_request).",
            Self::Patch => "Make a PATCH request (convenience wrapper around http_request).",
            Self::Delete => "Make a DELETE request (convenience wrapper around http_request).",
        }
    }

    #[must_use]
    pub fn input_schema(self) -> Value {
        let mut properties = json!({
            "url": {
                "type": "string",
                "description": "The URL to request (must start with http:// or https://)"
            },
            "headers": {
                "type": "object",
                "description": "Custom headers as key-value pairs",
                "additionalProperties": { "type": ["string", "number", "boolean"] }
            },
            "params": {
                "type": "object",
                "description": "Query parameters as key-value pairs, appended to the URL",
                "additionalProperties": { "type": ["string", "number", "boolean"] }
            },
            "timeout": {
                "type": "number",
                "minimum": crate::config::MIN_TIMEOUT_SECS,
                "maximum": crate::config::MAX_TIMEOUT_SECS,
                "description": "Request timeout in seconds (0.1-300, default 30)"
            }
        });

        if self.accepts_body() {
            properties["body"] = json!({
                "type": ["object", "array", "string", "number", "boolean", "null"],
                "description": "Request body: a JSON value, a form mapping, or a raw string"
            });
            properties["body_type"] = json!({
                "type": "string",
                "enum": ["json", "form", "text", "raw"],
                "default": "json",
                "description": "How to encode body: 'json', 'form', 'text' or 'raw'"
            });
        }

        if self == Self::Request {
            properties["method"] = json!({
                "type": "string",
                "enum": HttpMethod::ALL.map(HttpMethod::as_str),
                "default": "GET",
                "description": "HTTP method (case-insensitive)"
            });
            properties["follow_redirects"] = json!({
                "type": "boolean",
                "default": true,
                "description": "Whether to follow redirects (at most 10 hops)"
            });
            properties["verify_ssl"] = json!({
                "type": "boolean",
                "default": true,
                "description": "Whether to verify TLS certificates. Disabling this trusts any certificate the server presents."
            });
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": ["url"],
        })
    }

    #[must_use]
    pub fn to_tool(self) -> Tool {
        let schema_obj = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name(), self.description(), Arc::new(schema_obj));
        tool.annotations = Some(match self.fixed_method() {
            Some(m) => annotations_for_method(m, self.title()),
            None => annotations_for_any_method(self.title()),
        });
        tool
    }

    /// Map this tool's arguments onto the full `http_request` argument set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arguments are not an object or a field has the wrong type.
    pub fn request_args(self, arguments: Value) -> Result<RequestArgs> {
        let mut args = RequestArgs::from_value(arguments)?;
        let Some(method) = self.fixed_method() else {
            return Ok(args);
        };

        args.method = Some(method.as_str().to_string());
        args.follow_redirects = None;
        args.verify_ssl = None;
        if !self.accepts_body() {
            args.body = None;
            args.body_type = None;
        }
        Ok(args)
    }
}

/// Every tool, in catalog order.
#[must_use]
pub fn list_tools() -> Vec<Tool> {
    HttpTool::ALL.into_iter().map(HttpTool::to_tool).collect()
}
