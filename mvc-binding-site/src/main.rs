//! mvc-binding-site - Model binding test website
//!
//! Serves the built-in binding scenarios over HTTP.
//!
//! Binding options resolve in priority order: `--config`, the
//! MVC_BINDING_CONFIG environment variable, the platform config directory,
//! compiled defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mvc_binding::config::load_options;
use mvc_binding_site::{build_router, AppState};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Command-line arguments for mvc-binding-site
#[derive(Parser, Debug)]
#[command(name = "mvc-binding-site")]
#[command(about = "Model binding scenario website")]
#[command(version)]
struct Args {
    /// Binding options file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "MVC_BINDING_SITE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "MVC_BINDING_SITE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!(
        "Starting MVC binding site v{}",
        env!("CARGO_PKG_VERSION")
    );

    let options = load_options(args.config.as_deref()).context("Failed to load binding options")?;
    info!(
        max_allowed_errors = options.max_allowed_errors,
        max_recursion_depth = options.max_recursion_depth,
        max_collection_size = options.max_collection_size,
        "Binding options ready"
    );

    let shutdown = CancellationToken::new();
    let state = AppState::from_options(options, shutdown.clone())
        .context("Failed to initialize binding engine")?;
    info!(
        "Registered {} scenarios: {}",
        state.scenarios.len(),
        state.scenarios.names().collect::<Vec<_>>().join(", ")
    );
    for scenario in state.scenarios.iter() {
        debug!("  {}: {}", scenario.name, scenario.description);
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .context("Failed to bind to address")?;
    info!("mvc-binding-site listening on http://{}:{}", args.host, args.port);
    info!("Health check: http://{}:{}/health", args.host, args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight bindings
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }

    shutdown.cancel();
}
