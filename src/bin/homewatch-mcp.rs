use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homewatch::service::HomewatchService;
use homewatch::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Streamable HTTP on the configured host/port
    Http,
    /// Stdio, for clients that spawn the server directly
    Stdio,
}

#[derive(Parser)]
#[command(name = "homewatch-mcp")]
#[command(about = "Read-only Home Assistant MCP server")]
#[command(version)]
struct Cli {
    /// Home Assistant URL (e.g. http://homeassistant.local:8123)
    #[arg(long = "url", env = "HA_URL")]
    url: String,

    /// Home Assistant long-lived access token
    #[arg(long = "token", env = "HA_TOKEN", hide_env_values = true)]
    token: String,

    /// Path to the ha-config repository clone
    #[arg(long = "repo", env = "REPO_PATH")]
    repo: PathBuf,

    /// Directory for health reports and the trend snapshot
    #[arg(long = "data-dir", env = "DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Host to bind the HTTP transport to
    #[arg(long, env = "HOMEWATCH_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP transport
    #[arg(long, env = "HOMEWATCH_PORT", default_value_t = 5100)]
    port: u16,

    /// MCP transport to serve
    #[arg(long, value_enum, default_value_t = Transport::Http)]
    transport: Transport,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr only; stdout may carry the MCP transport.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new(cli.url, cli.token, cli.repo, cli.data_dir)?;

    tracing::info!("Home Assistant URL: {}", settings.ha_url);
    tracing::info!("Config repo: {}", settings.repo_path.display());

    let service = HomewatchService::new(&settings);

    match cli.transport {
        Transport::Stdio => {
            let server = service
                .serve(stdio())
                .await
                .inspect_err(|error| tracing::error!(%error, "error serving"))?;
            server.waiting().await?;
        }
        Transport::Http => {
            let http_service = StreamableHttpService::new(
                move || Ok(service.clone()),
                LocalSessionManager::default().into(),
                Default::default(),
            );
            let app = axum::Router::new().nest_service("/mcp", http_service);

            let addr = format!("{}:{}", cli.host, cli.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("MCP server listening on http://{addr}/mcp");

            let shutdown = CancellationToken::new();
            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("shutdown signal received");
                    signal_token.cancel();
                }
            });

            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await?;
        }
    }

    Ok(())
}
