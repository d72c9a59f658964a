//! Stdio and streamable HTTP transports.

use crate::handler::HttpClientServer;
use anyhow::Context as _;
use axum::Router;
use axum::routing::get;
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve one MCP session over stdin/stdout until the peer disconnects.
///
/// # Errors
///
/// Returns an error if the MCP handshake fails or the session ends abnormally.
pub async fn serve_stdio(server: HttpClientServer) -> anyhow::Result<()> {
    info!("serving MCP over stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("start stdio MCP session")?;
    service.waiting().await.context("stdio MCP session")?;
    Ok(())
}

/// Router with the MCP endpoint at `/mcp` and a liveness probe at `/health`.
pub fn router(server: HttpClientServer, shutdown: CancellationToken) -> Router {
    let config = StreamableHttpServerConfig {
        cancellation_token: shutdown,
        ..StreamableHttpServerConfig::default()
    };
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        config,
    );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", mcp)
}

/// Serve streamable HTTP on `bind` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if `bind` cannot be bound or the server fails.
pub async fn serve_http(
    server: HttpClientServer,
    bind: SocketAddr,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!(bind = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let app = router(server, shutdown.child_token());
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("http server")?;
    Ok(())
}
