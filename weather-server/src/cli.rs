use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use weather_core::{Config, provider::provider_from_config, store::store_from_config};
use weather_server::{AppState, router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather records HTTP API")]
pub struct Cli {
    /// Path to a TOML config file. Defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. "127.0.0.1:8000". Overrides the config file.
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }

        let provider = provider_from_config(&config)?;
        let store = store_from_config(&config)?;
        let app = router(AppState::new(provider, store));

        let listener = TcpListener::bind(config.server.bind)
            .await
            .with_context(|| format!("Failed to bind {}", config.server.bind))?;
        tracing::info!(addr = %config.server.bind, table = %config.store.table, "Weather API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        tracing::info!("Weather API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
