//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{ServiceConfig, DEFAULT_BASE_URL, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
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

/// Values that take precedence over the config file, usually sourced from
/// CLI flags or `PORT` / `BASE_URL` in the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub base_url: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
    }
}

/// Load, override, and validate configuration.
///
/// Without a path the built-in defaults are the starting point.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    overrides.apply(&mut config);

    // An unset base URL follows the port the service actually listens on.
    if config.base_url == DEFAULT_BASE_URL && config.port != DEFAULT_PORT {
        config.base_url = format!("http://localhost:{}", config.port);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document into a config. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
