//! Runtime for executing HTTP tool calls.
//!
//! A single [`HttpToolSource`] is built at startup and shared by every invocation. It owns the
//! HTTP clients; everything else is per call.

use crate::config::{HttpToolsConfig, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use crate::error::{HttpToolsError, Result};
use crate::request::{OutboundRequest, RequestArgs};
use crate::response::{
    InboundResponse, RequestSummary, error_payload, headers_to_map, shape_body, success_payload,
};
use crate::safety::redact_url;
use crate::status::status_text;
use crate::tools::HttpTool;
use reqwest::Client;
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One client per (TLS verification, redirect policy) combination. Each is internally pooled and
/// safe to share across concurrent calls.
#[derive(Debug, Clone)]
struct ClientSet {
    verified_follow: Client,
    verified_manual: Client,
    insecure_follow: Client,
    insecure_manual: Client,
}

impl ClientSet {
    fn build(config: &HttpToolsConfig) -> Result<Self> {
        let build = |verify_tls: bool, follow_redirects: bool| {
            let redirect = if follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            };
            Client::builder()
                .user_agent(config.user_agent.as_str())
                .pool_idle_timeout(config.pool_idle_timeout())
                .redirect(redirect)
                .danger_accept_invalid_certs(!verify_tls)
                .build()
                .map_err(|e| HttpToolsError::Config(format!("failed to build HTTP client: {e}")))
        };

        Ok(Self {
            verified_follow: build(true, true)?,
            verified_manual: build(true, false)?,
            insecure_follow: build(false, true)?,
            insecure_manual: build(false, false)?,
        })
    }

    fn pick(&self, verify_tls: bool, follow_redirects: bool) -> &Client {
        match (verify_tls, follow_redirects) {
            (true, true) => &self.verified_follow,
            (true, false) => &self.verified_manual,
            (false, true) => &self.insecure_follow,
            (false, false) => &self.insecure_manual,
        }
    }
}

#[derive(Clone)]
pub struct HttpToolSource {
    inner: Arc<HttpToolSourceInner>,
}

struct HttpToolSourceInner {
    config: HttpToolsConfig,
    clients: ClientSet,
}

impl HttpToolSource {
    /// Build the tool source.
    ///
    /// The resulting instance is immutable and safe to share across tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the default timeout is out of range or an HTTP client cannot be built.
    pub fn new(config: HttpToolsConfig) -> Result<Self> {
        let t = config.default_timeout_secs;
        if !t.is_finite() || !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&t) {
            return Err(HttpToolsError::Config(format!(
                "default timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds, got {t}"
            )));
        }

        let clients = ClientSet::build(&config)?;
        Ok(Self {
            inner: Arc::new(HttpToolSourceInner { config, clients }),
        })
    }

    /// List the MCP `Tool`s exposed by this source.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        crate::tools::list_tools()
    }

    /// Execute a tool call.
    ///
    /// Validation, transport and cancellation failures are returned as `Ok` results with
    /// `is_error` set, so the host always gets a classified, structured answer.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` if `tool_name` is not one of the HTTP tools.
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Value,
        cancel: Option<&CancellationToken>,
    ) -> Result<CallToolResult> {
        let tool = HttpTool::from_name(tool_name)
            .ok_or_else(|| HttpToolsError::UnknownTool(tool_name.to_string()))?;

        let args = match tool.request_args(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(rejected(tool_name, &RequestSummary::default(), &e)),
        };

        let summary = RequestSummary::from_args(&args);
        let request = match self.prepare(args) {
            Ok(req) => req,
            Err(e) => return Ok(rejected(tool_name, &summary, &e)),
        };
        let summary = RequestSummary::from_request(&request);

        let outcome = match cancel {
            Some(ct) => {
                tokio::select! {
                    biased;
                    () = ct.cancelled() => Err(HttpToolsError::Cancelled),
                    res = self.execute(&request) => res,
                }
            }
            None => self.execute(&request).await,
        };

        match outcome {
            Ok(response) => {
                info!(
                    tool = %tool_name,
                    method = %request.method,
                    url = %redact_url(&request.url),
                    status = response.status_code,
                    elapsed_ms = response.elapsed_ms,
                    truncated = response.truncated,
                    "http request completed"
                );
                Ok(tool_result(success_payload(&summary, &response), false))
            }
            Err(e) => {
                warn!(
                    tool = %tool_name,
                    method = %request.method,
                    url = %redact_url(&request.url),
                    kind = %e.kind(),
                    error = %e,
                    "http request failed"
                );
                Ok(tool_result(error_payload(&summary, &e), true))
            }
        }
    }

    /// Validate arguments against this source's defaults.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn prepare(&self, args: RequestArgs) -> Result<OutboundRequest> {
        OutboundRequest::from_args(args, self.inner.config.default_timeout_secs)
    }

    /// Perform exactly one round trip for `request`. No retries.
    ///
    /// # Errors
    ///
    /// Returns `Timeout`, `Connection`, `Tls` or `Transport` errors classified from the
    /// underlying client failure.
    pub async fn execute(&self, request: &OutboundRequest) -> Result<InboundResponse> {
        if !request.verify_tls {
            warn!(
                url = %redact_url(&request.url),
                "TLS certificate verification disabled for this request"
            );
        }
        debug!(
            method = %request.method,
            url = %redact_url(&request.url),
            timeout_secs = request.timeout.as_secs_f64(),
            "sending http request"
        );

        let client = self
            .inner
            .clients
            .pick(request.verify_tls, request.follow_redirects);
        let timeout_secs = request.timeout.as_secs_f64();
        let transport_err = |e: reqwest::Error| HttpToolsError::from_transport(&e, timeout_secs);

        let mut builder = client
            .request(request.method.to_reqwest(), request.url.clone())
            .timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.as_str().to_string());
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(transport_err)?;

        let status = response.status();
        let headers = headers_to_map(response.headers());
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        let final_url = response.url().to_string();

        let (bytes, truncated) =
            read_response_body_limited(response, self.inner.config.max_response_bytes)
                .await
                .map_err(transport_err)?;
        let elapsed = started.elapsed();

        let body = shape_body(&bytes, content_type.as_deref(), truncated);
        Ok(InboundResponse {
            status_code: status.as_u16(),
            status_text: status_text(status.as_u16()),
            headers,
            content_type,
            content: body.content,
            content_encoding: body.content_encoding,
            json: body.json,
            elapsed_ms: round_ms(elapsed.as_secs_f64() * 1000.0),
            final_url,
            truncated,
        })
    }
}

fn rejected(tool_name: &str, summary: &RequestSummary, e: &HttpToolsError) -> CallToolResult {
    warn!(tool = %tool_name, kind = %e.kind(), error = %e, "http tool arguments rejected");
    tool_result(error_payload(summary, e), true)
}

/// Return both `structured_content` and `Content::text(...)`: some MCP clients only render
/// `content` and ignore `structured_content`.
fn tool_result(payload: Value, is_error: bool) -> CallToolResult {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(payload),
        is_error: Some(is_error),
        meta: None,
    }
}

/// Read at most `max_bytes`; anything past the bound is dropped and reported as truncated.
async fn read_response_body_limited(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> reqwest::Result<(Vec<u8>, bool)> {
    let mut out: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = max_bytes.saturating_sub(out.len());
        if chunk.len() > remaining {
            out.extend_from_slice(&chunk[..remaining]);
            return Ok((out, true));
        }
        out.extend_from_slice(&chunk);
    }
    Ok((out, false))
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
