//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, metrics)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogStore;
use crate::config::{CorsConfig, ServiceConfig};
use crate::http::request::{propagate_request_id, set_request_id};
use crate::http::{catalog, media};
use crate::media::{UpstreamClient, UpstreamError};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server for the catalog API and media proxy.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new(config: ServiceConfig, catalog: Arc<dyn CatalogStore>) -> Result<Self, UpstreamError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream, &config.retries)?);
        let state = AppState { catalog, upstream };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/status", get(catalog::status))
            .route("/songs", get(catalog::list_songs))
            .route("/song/{id}", get(catalog::get_song))
            .route("/random-song", get(catalog::random_song))
            .route("/artists", get(catalog::list_artists))
            .route("/artist/{id}", get(catalog::get_artist))
            .route("/albums", get(catalog::list_albums))
            .route("/album/{id}", get(catalog::get_album))
            .route("/genres", get(catalog::list_genres))
            .route("/genre/{id}", get(catalog::get_genre))
            .route("/stream/image/{*path}", get(media::stream_image))
            .route("/stream/song/{*path}", get(media::stream_song))
            .route("/get/lyric/{*path}", get(media::get_lyric))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(cors_layer(&config.cors))
            .layer(propagate_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id())
    }

    /// The router, for driving the service without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers(AllowHeaders::mirror_request())
}
