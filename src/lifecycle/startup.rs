//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Bind the listener last, so traffic only arrives when ready

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::catalog::{MongoCatalog, StoreError};
use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::media::UpstreamError;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("catalog store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("upstream client setup failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the service up and serve until `shutdown` fires.
pub async fn start(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let catalog = MongoCatalog::connect(&config.store).await?;
    let server = HttpServer::new(config, Arc::new(catalog))?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        src_uri = %server.config().upstream.src_uri,
        "Listening for connections"
    );

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
