use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, utils};
use router::{AppState, create_router};
use std::net::{IpAddr, SocketAddr};

#[derive(Parser)]
#[command(name = "helios")]
#[command(about = "Helios - OVS metrics query gateway for Prometheus")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<HeliosCommands>,

    #[arg(long, help = "Bind address for the HTTP API (overrides config)")]
    bind: Option<String>,

    #[arg(long, help = "HTTP API port (overrides config)")]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum HeliosCommands {
    #[command(flatten)]
    Common(CommonCommands),
}

impl Default for HeliosCommands {
    fn default() -> Self {
        Self::Common(CommonCommands::Start)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on CLI arguments
    utils::init_logging(&cli.common);

    // Load application configuration
    let mut config = utils::load_config(cli.common.config.as_ref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Handle common commands that don't require starting the service
    let command = cli.command.unwrap_or_default();
    let HeliosCommands::Common(ref common_cmd) = command;
    if utils::handle_common_command(common_cmd, &config).await? {
        return Ok(());
    }

    utils::validate_config(&config).context("Invalid configuration")?;

    log::info!("Starting Helios {}", env!("CARGO_PKG_VERSION"));

    let bind_ip = config
        .server
        .bind
        .parse::<IpAddr>()
        .context("Invalid bind address")?;
    let http_addr = SocketAddr::new(bind_ip, config.server.port);

    let state = AppState::from_config(config).context("Failed to create backend client")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP API on {http_addr}"))?;
    log::info!("HTTP API listening on {http_addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    log::info!("Helios stopped gracefully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl+c signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down Helios...");
}
