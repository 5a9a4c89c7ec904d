//! gozero-ai - Item Recognition Microservice
//!
//! Turns a photo of a waste item into disposal guidance. Uses a live vision
//! model when a credential is configured and a deterministic sample catalog
//! otherwise.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gozero_ai::config::resolve_vision_config;
use gozero_ai::recognition::SampleCatalog;
use gozero_ai::AppState;
use gozero_common::config::{load_or_default, resolve_config_path};

const DEFAULT_LOG_FILTER: &str = "gozero_ai=info,tower_http=info";

/// Command-line arguments for gozero-ai
#[derive(Parser, Debug)]
#[command(name = "gozero-ai")]
#[command(about = "Item recognition microservice for GoZero")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides [server] port)
    #[arg(short, long, env = "GOZERO_AI_PORT")]
    port: Option<u16>,

    /// Host to bind (overrides [server] host)
    #[arg(long, env = "GOZERO_AI_HOST")]
    host: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), "GOZERO_CONFIG", "gozero-ai");
    let toml_config =
        load_or_default(config_path.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            toml_config
                .logging
                .filter
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILTER),
        )
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting GoZero Item Recognition (gozero-ai) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: none (defaults)"),
    }

    // A corrupt catalog is fatal
    let catalog = Arc::new(SampleCatalog::builtin().context("Sample catalog failed validation")?);
    info!(
        "Sample catalog v{} loaded ({} entries)",
        catalog.version(),
        catalog.len()
    );

    let vision_config = resolve_vision_config(&toml_config);
    let state = AppState::from_config(&vision_config, catalog)
        .context("Failed to initialize inference client")?;

    let app = gozero_ai::build_router(state);

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
