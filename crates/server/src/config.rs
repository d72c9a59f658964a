//! Command-line and environment configuration.

use crate::logging::LogFormat;
use clap::{Parser, ValueEnum};
use http_client_mcp_tools::HttpToolsConfig;
use http_client_mcp_tools::config::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT_SECS, default_user_agent,
};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// MCP over stdin/stdout (one JSON-RPC message per line).
    Stdio,
    /// MCP streamable HTTP at `/mcp`.
    Http,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "http-client-mcp", version, about = "MCP server exposing HTTP request tools")]
pub struct Cli {
    #[arg(long, env = "HTTP_CLIENT_MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Listen address for the http transport.
    #[arg(long, env = "HTTP_CLIENT_MCP_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Timeout for calls that do not pass one (seconds).
    #[arg(long, env = "HTTP_CLIENT_MCP_DEFAULT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub default_timeout_secs: f64,

    /// Response bodies are truncated after this many bytes.
    #[arg(long, env = "HTTP_CLIENT_MCP_MAX_RESPONSE_BYTES", default_value_t = DEFAULT_MAX_RESPONSE_BYTES)]
    pub max_response_bytes: usize,

    #[arg(long, env = "HTTP_CLIENT_MCP_MAX_REDIRECTS", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    #[arg(long, env = "HTTP_CLIENT_MCP_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, env = "HTTP_CLIENT_MCP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "HTTP_CLIENT_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    #[must_use]
    pub fn tools_config(&self) -> HttpToolsConfig {
        HttpToolsConfig {
            default_timeout_secs: self.default_timeout_secs,
            max_response_bytes: self.max_response_bytes,
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone().unwrap_or_else(default_user_agent),
            ..HttpToolsConfig::default()
        }
    }
}
