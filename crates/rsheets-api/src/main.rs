//! rsheets server binary
//!
//! HTTP facade over an upstream spreadsheet service, with coalesced batch
//! reads and configurable spreadsheet aliases.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! rsheets --config config.yaml
//!
//! # With environment variables only
//! RSHEETS_UPSTREAM__BACKEND=memory rsheets
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, Level};

use rsheets_api::http::{create_router, AppState};
use rsheets_api::observability::{init_logging, LoggingConfig};
use rsheets_domain::AliasTable;
use rsheets_server::ServerConfig;
use rsheets_upstream::{
    MemorySheetsClient, RestClientConfig, RestSheetsClient, SheetsClient,
};

/// rsheets - Spreadsheet service facade with coalesced batch reads
#[derive(Parser, Debug)]
#[command(name = "rsheets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    init_logging(LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(version = env!("CARGO_PKG_VERSION"), "Starting rsheets server");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let aliases = AliasTable::new(config.aliases.clone());
    if !aliases.is_empty() {
        info!(count = config.aliases.len(), "Spreadsheet aliases configured");
    }

    match config.upstream.backend.as_str() {
        "memory" => {
            info!("Using in-memory upstream backend");
            let client = Arc::new(MemorySheetsClient::new());
            run_server(client, aliases, addr).await
        }
        "rest" => {
            info!(base_url = %config.upstream.base_url, "Using REST upstream backend");
            let client = Arc::new(RestSheetsClient::new(&RestClientConfig {
                base_url: config.upstream.base_url.clone(),
                auth_token: config.upstream.auth_token.clone(),
                request_timeout_secs: config.upstream.request_timeout_secs,
            })?);
            run_server(client, aliases, addr).await
        }
        other => anyhow::bail!("Unknown upstream backend: {other}"),
    }
}

/// Run the HTTP server with graceful shutdown.
async fn run_server<C: SheetsClient>(
    client: Arc<C>,
    aliases: AliasTable,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let state = AppState::new(client, aliases);
    let router = create_router(state);

    info!(%addr, "HTTP server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Parse log level from string.
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
