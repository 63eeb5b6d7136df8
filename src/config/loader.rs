//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then
/// environment overrides. The result is validated before it is returned.
///
/// `env` looks up a variable by name; `main` passes `std::env::var`.
pub fn load_config<F>(path: Option<&Path>, env: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, env);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the deployment environment variables onto a configuration.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = env("MONGO_URI") {
        config.store.uri = uri;
    }
    if let Some(uri) = env("SRC_URI") {
        config.upstream.src_uri = uri;
    }
    if let Some(addr) = env("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    } else if let Some(port) = env("PORT") {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Some(level) = env("LOG_LEVEL") {
        config.observability.log_level = level;
    }
}
