use anyhow::Context as _;
use clap::Parser as _;
use http_client_mcp::{Cli, HttpClientServer, Transport, logging, transport};
use http_client_mcp_tools::HttpToolSource;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format).context("init logging")?;

    let config = cli.tools_config();
    info!(
        default_timeout_secs = config.default_timeout_secs,
        max_response_bytes = config.max_response_bytes,
        max_redirects = config.max_redirects,
        user_agent = %config.user_agent,
        "starting http-client-mcp"
    );
    let source = HttpToolSource::new(config).context("build HTTP client")?;
    let server = HttpClientServer::new(source);

    match cli.transport {
        Transport::Stdio => transport::serve_stdio(server).await,
        Transport::Http => {
            let shutdown = CancellationToken::new();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("shutdown requested");
                }
                signal.cancel();
            });
            transport::serve_http(server, cli.bind, shutdown).await
        }
    }
}
