//! Configuration validation.

use super::types::GateConfig;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Unsupported endpoint scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

/// Validate gate configuration, returning the parsed endpoint.
pub fn validate_config(config: &GateConfig) -> Result<Url, Vec<ConfigError>> {
    let mut errors = Vec::new();

    let endpoint = match Url::parse(&config.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            errors.push(ConfigError::UnsupportedScheme(url.scheme().to_string()));
            None
        }
        Err(e) => {
            errors.push(ConfigError::InvalidEndpoint {
                url: config.endpoint.clone(),
                reason: e.to_string(),
            });
            None
        }
    };

    if config.request_timeout_secs == 0 {
        errors.push(ConfigError::ZeroTimeout);
    }

    match endpoint {
        Some(url) if errors.is_empty() => Ok(url),
        _ => Err(errors),
    }
}
