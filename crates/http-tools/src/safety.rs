//! Outbound URL validation and redaction helpers.
//!
//! Nothing here blocks destinations: the host decides where requests go. This module only
//! rejects URLs that cannot be sent at all and keeps credentials out of logs and echoed results.

use crate::error::HttpToolsError;
use std::collections::BTreeMap;
use url::Url;

/// Header names whose values are replaced in echoed requests and logs (compared
/// case-insensitively).
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

pub const REDACTED: &str = "***REDACTED***";

/// Parse and validate a target URL.
///
/// # Errors
///
/// Returns `InvalidUrl` if the string is empty, does not parse as an absolute URL, uses a scheme
/// other than `http`/`https`, or has no host.
pub fn parse_target_url(raw: &str) -> Result<Url, HttpToolsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(HttpToolsError::InvalidUrl("URL must not be empty".to_string()));
    }

    let url = Url::parse(raw).map_err(|e| HttpToolsError::InvalidUrl(format!("'{raw}': {e}")))?;

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(HttpToolsError::InvalidUrl(format!(
            "unsupported URL scheme '{scheme}': URL must start with http:// or https://"
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(HttpToolsError::InvalidUrl(format!("'{raw}': missing host")));
    }

    Ok(url)
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[must_use]
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name.trim()))
}

/// Copy of `headers` with sensitive values replaced.
#[must_use]
pub fn redact_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            let v = if is_sensitive_header(k) {
                REDACTED.to_string()
            } else {
                v.clone()
            };
            (k.clone(), v)
        })
        .collect()
}
