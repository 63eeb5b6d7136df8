//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the catalog service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Document store connection settings.
    pub store: StoreConfig,

    /// Remote object store holding audio, images and lyrics.
    pub upstream: UpstreamConfig,

    /// Retry policy for upstream calls.
    pub retries: RetryConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`).
    pub uri: String,

    /// Database used when the connection string does not name one.
    pub database: String,

    /// Upper bound on pooled driver connections.
    pub max_pool_size: Option<u32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test".to_string(),
            max_pool_size: None,
        }
    }
}

/// Object store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URI resource paths are appended to. Required.
    pub src_uri: String,

    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for upstream response headers in seconds.
    /// `None` waits as long as the client does; body streaming is never cut.
    pub response_timeout_secs: Option<u64>,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` style environment settings.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            src_uri: String::new(),
            connect_timeout_secs: 10,
            response_timeout_secs: None,
            use_system_proxy: true,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries. Off keeps upstream calls fail-fast.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://arythmlite.netlify.app".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [upstream]
            src_uri = "https://storage.example.com/bucket"

            [retries]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.src_uri, "https://storage.example.com/bucket");
        assert_eq!(config.upstream.connect_timeout_secs, 10);
        assert!(config.retries.enabled);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.cors.allowed_origins.len(), 2);
    }
}
