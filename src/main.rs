//! Egg Tracker Server
//!
//! Serves the egg ledger over WebSocket. Configuration comes from
//! `EGG_TRACKER_*` environment variables; log filtering from `RUST_LOG`.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use egg_tracker::{
    config::AppConfig,
    network::{LedgerServer, LedgerService},
    VERSION,
};

#[cfg(feature = "debug-tracing")]
const DEFAULT_FILTER: &str = "debug";
#[cfg(not(feature = "debug-tracing"))]
const DEFAULT_FILTER: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Egg Tracker Server v{}", VERSION);

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!("Store: {:?}", config.store);
    info!("Speckle tuning: {}", config.server.speckle_tuning);

    let store = config.store.open().context("Failed to open egg store")?;
    info!("Opened {} store with {} rows", store.name(), store.len()?);

    let service = LedgerService::new(store, config.server.speckle_tuning);
    let server = LedgerServer::new(config.server, service);

    tokio::select! {
        result = server.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Ctrl-C received, shutting down"),
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            }
            server.shutdown();
            // Give connection tasks a moment to send their shutdown notice.
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    Ok(())
}
