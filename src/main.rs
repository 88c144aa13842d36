// src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use price_arb::api::{self, AppState};
use price_arb::catalog::{fixture::load_catalog, Catalog};
use price_arb::config::AppConfig;
use price_arb::mock_feed::{price_drift::start_price_drift, CatalogStore};
use price_arb::telemetry;


#[derive(Debug, Parser)]
#[command(name = "price_arb", about = "Cross-marketplace price arbitrage API")]
struct Cli {
    /// TOML config file. Defaults apply when it does not exist.
    #[arg(long, default_value = "config/price_arb.toml")]
    config: PathBuf,

    /// JSON catalog to serve instead of the bundled demo catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Listen address, overrides `[server] bind`.
    #[arg(long)]
    bind: Option<String>,
}


#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    telemetry::init(&config.logging);
    if !config_found {
        info!(path = %cli.config.display(), "no config file found, using defaults");
    }

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::demo()?,
    };
    info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        strategy = ?config.scan.strategy,
        "catalog loaded"
    );

    let store = CatalogStore::new(catalog.clone());
    if config.feed.enabled {
        start_price_drift(store.clone(), catalog, &config.feed)?;
        info!(interval_ms = config.feed.interval_ms, "simulated price feed started");
    }

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    let state = Arc::new(AppState::with_store(store, config));

    tokio::select! {
        result = api::serve(listener, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }
    Ok(())
}
