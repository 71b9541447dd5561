//! mcat-api - Music catalog HTTP service
//!
//! Loads `music.json` from the data directory once at startup and serves
//! search, track lookup and audio streaming. A catalog that is missing or
//! unparsable stops the process before the listener is bound.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mcat_api::{build_router, AppState};
use mcat_common::config::{BootstrapConfig, CliOverrides, TomlConfig};
use mcat_common::Catalog;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mcat-api
#[derive(Parser, Debug)]
#[command(name = "mcat-api")]
#[command(about = "In-memory music catalog API")]
#[command(version)]
struct Args {
    /// Data directory containing music.json and audio/
    #[arg(short, long, env = "MCAT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Host to bind
    #[arg(long, env = "MCAT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MCAT_PORT")]
    port: Option<u16>,

    /// TOML config file
    #[arg(short, long, env = "MCAT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // TOML first so its log level can seed the filter
    let (toml_config, config_source) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration file")?;

    let config = BootstrapConfig::resolve(
        CliOverrides {
            data_dir: args.data_dir,
            host: args.host,
            port: args.port,
        },
        &toml_config,
    );

    // Initialize tracing
    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("mcat_api={level},mcat_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting mcat-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_source {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    info!("Data directory: {}", config.data.root().display());

    let catalog_path = config.data.catalog_path();
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    let audio_root = config.data.audio_root();
    info!("Audio root: {}", audio_root.display());

    let state = AppState::new(catalog, audio_root);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("mcat-api listening on http://{}", addr);
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn help_lists_environment_variables() {
        let help = Args::command().render_long_help().to_string();
        for var in ["MCAT_DATA_DIR", "MCAT_HOST", "MCAT_PORT", "MCAT_CONFIG"] {
            assert!(help.contains(var), "missing {} in help", var);
        }
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from(["mcat-api", "--data-dir", "/srv/music", "-p", "9000"])
            .unwrap();
        assert_eq!(args.data_dir, Some(PathBuf::from("/srv/music")));
        assert_eq!(args.port, Some(9000));
    }
}
