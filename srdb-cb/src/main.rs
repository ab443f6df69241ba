//! srdb-cb (Catalog Browser) - song rights catalog web browser
//!
//! Loads the YAML catalog from a local directory or an HTTP base URL and
//! serves the catalog table, the featured performer table and the reports.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use srdb_cb::api::buildinfo::BuildInfo;
use srdb_cb::{build_router, AppState};
use srdb_common::catalog::InstallOutcome;
use srdb_common::config::{load_config, CatalogConfig, LoggingConfig};
use srdb_common::source::source_for_base;

/// Command-line arguments for srdb-cb
#[derive(Parser, Debug)]
#[command(name = "srdb-cb")]
#[command(about = "Song rights catalog browser")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SRDB_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory or http(s):// base URL, overrides the config file
    #[arg(short, long, env = "SRDB_DATA")]
    data: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SRDB_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SRDB_HOST")]
    host: Option<String>,
}

impl Args {
    /// Command-line values win over the file
    fn apply(&self, config: &mut CatalogConfig) {
        if let Some(data) = &self.data {
            config.data.base = data.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
    }
}

/// Install the tracing subscriber: RUST_LOG wins, otherwise the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},tower_http=info", logging.level)))
        .context("Invalid log level")?;

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging setup comes from the config, so config is read first and its
    // origin logged once the subscriber is installed
    let (mut config, origin) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    init_tracing(&config.logging)?;
    origin.log();

    // Build identification first, before any I/O
    info!("Starting SRDB Catalog Browser (srdb-cb) {}", BuildInfo::current());
    info!("Data source: {}", config.data.base);

    let source = source_for_base(&config.data.base).context("Invalid data base")?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(source, config);

    // A failed load keeps the service up; the views show the error panel
    match state.reload().await {
        InstallOutcome::Installed => {}
        InstallOutcome::Superseded => warn!("Initial catalog load was superseded"),
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("srdb-cb listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
