//! Music catalog query service and media streaming proxy.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod observability;
pub mod resilience;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
