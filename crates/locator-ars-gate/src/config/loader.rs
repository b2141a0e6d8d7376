//! Configuration loading utilities.

use super::types::GateConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load gate configuration from defaults, a file and the environment.
///
/// Later sources override earlier ones. Environment keys use the prefix and a
/// double underscore, e.g. `LOCATOR_ARS__ALLOW_ON_FAILURE=true`.
pub struct ConfigLoader {
    config_path: Option<String>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: "LOCATOR_ARS".to_string(),
        }
    }

    /// Set config file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration.
    pub fn load(&self) -> Result<GateConfig> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("defaults.toml"),
            config::FileFormat::Toml,
        ));

        if let Some(path) = &self.config_path {
            if Path::new(path).exists() {
                info!(path = %path, "Loading gate config file");
                builder = builder.add_source(config::File::with_name(path));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build gate configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize gate configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from `.env`, `LOCATOR_ARS_CONFIG` and the environment.
pub fn load_config() -> Result<GateConfig> {
    let _ = dotenvy::dotenv();

    let mut loader = ConfigLoader::new();
    if let Ok(path) = std::env::var("LOCATOR_ARS_CONFIG") {
        loader = loader.with_config_path(path);
    }

    loader.load()
}
