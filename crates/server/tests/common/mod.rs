#![allow(dead_code)]

use anyhow::Context as _;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

pub use http_client_mcp_test_support::KillOnDrop;

pub const BIN: &str = env!("CARGO_BIN_EXE_http-client-mcp");

pub fn pick_unused_port() -> anyhow::Result<u16> {
    http_client_mcp_test_support::pick_unused_port()
}

pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    http_client_mcp_test_support::wait_http_ok(url, timeout_dur).await
}

pub fn spawn_http_server(port: u16) -> anyhow::Result<Child> {
    Command::new(BIN)
        .arg("--transport")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--log-level")
        .arg("info")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn http-client-mcp")
}

/// Start the server on a fresh port and wait for `/health`.
pub async fn start_http_server() -> anyhow::Result<(String, KillOnDrop)> {
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_http_server(port)?);

    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(20)).await?;
    Ok((base_url, child))
}
