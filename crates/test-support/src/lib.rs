//! Shared fixtures for the HTTP client MCP test suites: local HTTP/HTTPS targets and port
//! helpers.

use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::net::{SocketAddr, TcpListener};
use std::process::Child;
use std::time::{Duration, Instant};

/// Kills the wrapped child process when dropped.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status (2xx/3xx).
///
/// # Errors
///
/// Returns an error if the timeout elapses before the endpoint returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// Size of the `/big` response body.
pub const BIG_BODY_BYTES: usize = 64 * 1024;

/// Routes served by both test targets:
///
/// - `/echo` (any method): JSON describing the received method, path, query, headers and body
/// - `/json`: `{"a":1}` as `application/json`
/// - `/slow`: answers after 10 seconds
/// - `/redirect`: `302 Found` to `/json`
/// - `/big`: [`BIG_BODY_BYTES`] of `x`
/// - `/status/{code}`: empty-ish body with the given status
#[must_use]
pub fn target_router() -> Router {
    Router::new()
        .route("/echo", any(echo_handler))
        .route("/json", get(json_handler))
        .route("/slow", get(slow_handler))
        .route("/redirect", get(redirect_handler))
        .route("/big", get(big_handler))
        .route("/status/{code}", any(status_handler))
}

async fn echo_handler(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> axum::Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();

    axum::Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn json_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"a":1}"#)
}

async fn slow_handler() -> &'static str {
    tokio::time::sleep(Duration::from_secs(10)).await;
    "done"
}

async fn redirect_handler() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/json")])
}

async fn big_handler() -> String {
    "x".repeat(BIG_BODY_BYTES)
}

async fn status_handler(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {code}"))
}

/// Plain HTTP target on an ephemeral localhost port. Shuts down on drop.
pub struct TestHttpServer {
    addr: SocketAddr,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestHttpServer {
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind test http server")?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, target_router()).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestHttpServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// HTTPS target presenting a freshly generated self-signed certificate for `localhost` /
/// `127.0.0.1`. Shuts down on drop.
pub struct TlsTestServer {
    addr: SocketAddr,
    handle: axum_server::Handle,
}

impl TlsTestServer {
    /// # Errors
    ///
    /// Returns an error if certificate generation, TLS setup or binding fails.
    pub async fn start() -> anyhow::Result<Self> {
        // Several rustls providers can be compiled into a test binary; pin one.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let rcgen::CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(vec![
            "localhost".to_string(),
            "127.0.0.1".to_string(),
        ])
        .context("generate self-signed certificate")?;

        let tls = axum_server::tls_rustls::RustlsConfig::from_pem(
            cert.pem().into_bytes(),
            key_pair.serialize_pem().into_bytes(),
        )
        .await
        .context("load TLS config")?;

        let listener = TcpListener::bind("127.0.0.1:0").context("bind test https server")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let handle = axum_server::Handle::new();
        let server = axum_server::from_tcp_rustls(listener, tls)
            .handle(handle.clone())
            .serve(target_router().into_make_service());
        tokio::spawn(async move {
            let _ = server.await;
        });

        Ok(Self { addr, handle })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("https://{}{path}", self.addr)
    }
}

impl Drop for TlsTestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

/// Accepts TCP connections and immediately resets them (`SO_LINGER` 0). Stops on drop.
pub struct ResetServer {
    addr: SocketAddr,
    task: tokio::task::JoinHandle<()>,
}

impl ResetServer {
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind reset server")?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                #[allow(deprecated)]
                let _ = stream.set_linger(Some(Duration::ZERO));
                drop(stream);
            }
        });
        Ok(Self { addr, task })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for ResetServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
