use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homewatch::bridge;
use homewatch::ha::HaClient;
use homewatch::health::HealthMonitor;
use homewatch::settings::Settings;

#[derive(Parser)]
#[command(name = "homewatch-bridge")]
#[command(about = "REST bridge for Home Assistant health checks")]
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

    /// Host to bind to
    #[arg(long, env = "BRIDGE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "BRIDGE_PORT", default_value_t = 5101)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new(cli.url, cli.token, cli.repo, cli.data_dir)?;

    let monitor = HealthMonitor::new(HaClient::new(&settings), settings.data_dir.clone());

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    let addr = format!("{}:{}", cli.host, cli.port);
    bridge::serve(&addr, monitor, shutdown).await
}
