//! HTTP semantics helpers.
//!
//! Generates MCP `ToolAnnotations` for the HTTP tools from RFC 9110-style method semantics.

use crate::request::HttpMethod;
use rmcp::model::ToolAnnotations;

/// Annotations for a tool bound to a single method.
///
/// `openWorldHint` is always `true`: every tool here talks to an external system.
#[must_use]
pub fn annotations_for_method(method: HttpMethod, title: &str) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match method {
        HttpMethod::Get | HttpMethod::Head | HttpMethod::Options => {
            (Some(true), Some(false), Some(true))
        }
        HttpMethod::Post => (Some(false), Some(false), Some(false)),
        HttpMethod::Put | HttpMethod::Delete => (Some(false), Some(true), Some(true)),
        // PATCH may or may not be idempotent; do not guess.
        HttpMethod::Patch => (Some(false), Some(true), None),
    };

    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}

/// Annotations for `http_request`, whose method is chosen per call: only the open-world hint is
/// known up front.
#[must_use]
pub fn annotations_for_any_method(title: &str) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: None,
        destructive_hint: None,
        idempotent_hint: None,
        open_world_hint: Some(true),
    }
}
