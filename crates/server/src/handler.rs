//! MCP surface: the HTTP tools plus the status-code reference resource.

use http_client_mcp_tools::status::{STATUS_CODES_REFERENCE, STATUS_CODES_URI};
use http_client_mcp_tools::{HttpToolSource, HttpToolsError};
use rmcp::model::{
    Annotated, CallToolRequestParams, CallToolResult, Implementation, ListResourcesResult,
    ListToolsResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

const INSTRUCTIONS: &str = "HTTP client tools. Use http_request for full control over method, \
headers, query parameters, body encoding, timeout, redirects and TLS verification, or the \
http_get/http_head/http_options/http_post/http_put/http_patch/http_delete shortcuts. Every \
result echoes the request and reports status, headers, body (parsed JSON when applicable), \
timing and the final URL. Read http://status-codes for a status code reference.";

#[derive(Clone)]
pub struct HttpClientServer {
    source: HttpToolSource,
}

impl HttpClientServer {
    #[must_use]
    pub fn new(source: HttpToolSource) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn info() -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn resources() -> Vec<Resource> {
        let mut raw = RawResource::new(STATUS_CODES_URI, "HTTP status codes");
        raw.description = Some("Reference of common HTTP status codes and their meaning".to_string());
        raw.mime_type = Some("text/markdown".to_string());
        vec![Annotated::new(raw, None)]
    }

    /// Dispatch a tool call.
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` for unknown tool names. Every other failure is a tool result with
    /// `is_error` set.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, Value>>,
        cancel: &CancellationToken,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.map_or(Value::Null, Value::Object);
        self.source
            .call_tool(name, arguments, Some(cancel))
            .await
            .map_err(|e| match e {
                HttpToolsError::UnknownTool(name) => ErrorData::invalid_params(
                    format!("unknown tool: {name}"),
                    Some(json!({ "tool": name })),
                ),
                other => ErrorData::internal_error(other.to_string(), None),
            })
    }

    /// # Errors
    ///
    /// Returns `resource_not_found` for any URI other than the status-code reference.
    pub fn read(uri: &str) -> Result<ReadResourceResult, ErrorData> {
        if uri != STATUS_CODES_URI {
            return Err(ErrorData::resource_not_found(
                format!("unknown resource: {uri}"),
                Some(json!({ "uri": uri })),
            ));
        }
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(STATUS_CODES_REFERENCE, uri)],
        })
    }
}

impl ServerHandler for HttpClientServer {
    fn get_info(&self) -> ServerInfo {
        Self::info()
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.source.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(&request.name, request.arguments, &context.ct)
            .await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult {
            resources: Self::resources(),
            ..Default::default()
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        Self::read(&request.uri)
    }
}
