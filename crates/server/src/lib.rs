//! MCP server exposing the HTTP request tools from `http-client-mcp-tools` over stdio or
//! streamable HTTP.

pub mod config;
pub mod handler;
pub mod logging;
pub mod transport;

pub use config::{Cli, Transport};
pub use handler::HttpClientServer;
