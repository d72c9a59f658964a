//! Error types for `http-client-mcp-tools`.

use crate::safety::sanitize_reqwest_error;
use serde::Serialize;
use std::error::Error as _;
use thiserror::Error;

/// Main error type for the request normalizer.
#[derive(Debug, Error)]
pub enum HttpToolsError {
    /// Startup errors (HTTP client could not be built).
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid HTTP method '{0}': must be one of GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS")]
    InvalidMethod(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Out-of-range timeout, malformed header, missing field.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request timed out after {secs} seconds")]
    Timeout { secs: f64 },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("http transport error: {0}")]
    Transport(String),

    #[error("request cancelled by the client")]
    Cancelled,

    #[error("tool not found: {0}")]
    UnknownTool(String),
}

pub type Result<T> = std::result::Result<T, HttpToolsError>;

/// Classification surfaced to the host in error results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Config,
    InvalidMethod,
    #[serde(rename = "InvalidURL")]
    InvalidUrl,
    InvalidBody,
    InvalidArgument,
    Timeout,
    ConnectionError,
    #[serde(rename = "TLSError")]
    TlsError,
    TransportError,
    Cancelled,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "Config",
            Self::InvalidMethod => "InvalidMethod",
            Self::InvalidUrl => "InvalidURL",
            Self::InvalidBody => "InvalidBody",
            Self::InvalidArgument => "InvalidArgument",
            Self::Timeout => "Timeout",
            Self::ConnectionError => "ConnectionError",
            Self::TlsError => "TLSError",
            Self::TransportError => "TransportError",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HttpToolsError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidMethod(_) => ErrorKind::InvalidMethod,
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::InvalidBody(_) => ErrorKind::InvalidBody,
            Self::InvalidArgument(_) | Self::UnknownTool(_) => ErrorKind::InvalidArgument,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Connection(_) => ErrorKind::ConnectionError,
            Self::Tls(_) => ErrorKind::TlsError,
            Self::Transport(_) => ErrorKind::TransportError,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Classify a transport failure.
    ///
    /// TLS is checked before the connection bucket: certificate and handshake failures
    /// surface from reqwest as connect errors with the rustls error somewhere in the source chain.
    /// Resets and early closes after the connect count as connection failures too.
    #[must_use]
    pub fn from_transport(e: &reqwest::Error, timeout_secs: f64) -> Self {
        if e.is_timeout() {
            return Self::Timeout { secs: timeout_secs };
        }
        let msg = describe_chain(e);
        let chain = source_chain(e);
        // Only the source chain: the top-level message embeds the URL.
        if chain.iter().any(|s| is_tls_failure(&s.to_string())) {
            return Self::Tls(msg);
        }
        if e.is_connect() || chain.iter().any(|s| is_connection_failure(*s)) {
            return Self::Connection(msg);
        }
        Self::Transport(msg)
    }
}

fn source_chain<'a>(e: &'a reqwest::Error) -> Vec<&'a (dyn std::error::Error + 'static)> {
    let mut out = Vec::new();
    let mut source = e.source();
    while let Some(s) = source {
        out.push(s);
        source = s.source();
    }
    out
}

fn is_connection_failure(e: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return matches!(
            io.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
        );
    }
    if let Some(h) = e.downcast_ref::<hyper::Error>() {
        return h.is_closed() || h.is_incomplete_message();
    }
    false
}

/// Top-level message plus every distinct source message, joined with `: `.
fn describe_chain(e: &reqwest::Error) -> String {
    let mut msg = sanitize_reqwest_error(e);
    let mut source = e.source();
    while let Some(s) = source {
        let part = s.to_string();
        if !msg.contains(&part) {
            msg.push_str(": ");
            msg.push_str(&part);
        }
        source = s.source();
    }
    msg
}

fn is_tls_failure(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    ["certificate", "handshake", "tls", "ssl"]
        .iter()
        .any(|needle| lower.contains(needle))
}
