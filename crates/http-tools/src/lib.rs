//! Request normalizer behind the HTTP client MCP tools.
//!
//! Turns loosely-typed tool arguments into exactly one validated HTTP exchange, executes it on a
//! shared client set, and shapes the outcome into a structured, size-bounded tool result. The MCP
//! server surface lives in `http-client-mcp`; this crate has no transport or session logic.

pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod runtime;
pub mod safety;
pub mod semantics;
pub mod status;
pub mod tools;

pub use config::HttpToolsConfig;
pub use error::{ErrorKind, HttpToolsError};
pub use request::{BodyType, HttpMethod, OutboundRequest, RequestArgs, RequestBody};
pub use response::InboundResponse;
pub use runtime::HttpToolSource;
pub use tools::HttpTool;
