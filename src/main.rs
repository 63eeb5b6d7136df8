//! arythm-server
//!
//! Catalog API over MongoDB plus a streaming proxy for the media files kept
//! in object storage.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                 ARYTHM SERVER                 │
//!    Client Request     │  ┌─────────┐    ┌──────────────┐              │
//!    ───────────────────┼─▶│  http   │───▶│ catalog.rs   │──▶ catalog ──┼──▶ MongoDB
//!                       │  │ server  │    │ handlers     │   (filters,  │
//!                       │  └────┬────┘    └──────────────┘   populate)  │
//!                       │       │         ┌──────────────┐              │
//!                       │       └────────▶│ media.rs     │──▶ media ────┼──▶ Object store
//!    Client Response    │                 │ handlers     │   (allowlist,│    (SRC_URI)
//!    ◀──────────────────┼─────────────────│ (streamed)   │    ranges)   │
//!                       │                 └──────────────┘              │
//!                       │  config · observability · resilience · lifecycle
//!                       └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use arythm_server::config::load_config;
use arythm_server::lifecycle::{self, Shutdown};
use arythm_server::observability::logging;

#[derive(Parser)]
#[command(name = "arythm-server", version, about = "Music catalog API and media streaming proxy")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal in production.
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), |key| std::env::var(key).ok())?;

    logging::init_logging(&config.observability);
    tracing::info!("arythm-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        retries_enabled = config.retries.enabled,
        response_timeout_secs = ?config.upstream.response_timeout_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
