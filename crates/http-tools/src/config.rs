//! Runtime configuration for the request normalizer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
pub const MIN_TIMEOUT_SECS: f64 = 0.1;
pub const MAX_TIMEOUT_SECS: f64 = 300.0;
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Process-level defaults. Every field except the client settings can be overridden per call.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpToolsConfig {
    /// Timeout applied when a call does not specify one (seconds).
    pub default_timeout_secs: f64,

    /// Response bodies are cut off after this many bytes.
    pub max_response_bytes: usize,

    /// Redirect hop limit when redirects are followed.
    pub max_redirects: usize,

    /// Idle pooled connections are closed after this many seconds.
    pub pool_idle_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for HttpToolsConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            pool_idle_timeout_secs: DEFAULT_POOL_IDLE_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpToolsConfig {
    #[must_use]
    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}

#[must_use]
pub fn default_user_agent() -> String {
    format!("http-client-mcp/{}", env!("CARGO_PKG_VERSION"))
}
