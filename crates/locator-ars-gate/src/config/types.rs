//! Gate configuration types.

use crate::credentials::CredentialScheme;
use locator_ars_common_log::LogLevel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default address of the access service.
pub const DEFAULT_ENDPOINT: &str = "http://locator/api/v1/ars/check";

/// Settings for one gate instance.
///
/// Read once when the gate is built. Only the log level of the default logger
/// can change afterwards, through `Gate::set_log_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Access service check endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Resolve failed remote checks to "allowed" instead of "denied".
    #[serde(default)]
    pub allow_on_failure: bool,
    /// Initial threshold of the default logger.
    #[serde(default)]
    pub log_level: LogLevel,
    /// Which credential headers requests carry.
    #[serde(default)]
    pub credential_scheme: CredentialScheme,
    /// Bound on every remote call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    5
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            allow_on_failure: false,
            log_level: LogLevel::default(),
            credential_scheme: CredentialScheme::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GateConfig {
    /// Default config pointing at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the failure policy.
    pub fn with_allow_on_failure(mut self, allow_on_failure: bool) -> Self {
        self.allow_on_failure = allow_on_failure;
        self
    }

    /// Set the initial log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Select the credential headers.
    pub fn with_credential_scheme(mut self, scheme: CredentialScheme) -> Self {
        self.credential_scheme = scheme;
        self
    }

    /// Set the remote call timeout in seconds.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Remote call timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
