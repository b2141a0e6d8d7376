//! The authorization gate.

use crate::client::DecisionClient;
use crate::config::GateConfig;
use crate::credentials::{CredentialScheme, Credentials};
use crate::decision::{AccessCheck, FailPolicy, Verdict};
use crate::error::{GateError, GateRejection};
use crate::middleware::RequireActionLayer;
use axum::http::HeaderMap;
use locator_ars_common_log::spans::{check_span, instrument_future};
use locator_ars_common_log::{log_error, log_info, DefaultLogger, LogLevel, Logger};
use std::sync::Arc;

/// Enforces remote access decisions on requests.
///
/// A gate holds no per-request state and can be cloned freely; clones share
/// the checker and the logger.
pub struct Gate<L: Logger = DefaultLogger> {
    checker: Arc<dyn AccessCheck>,
    logger: Arc<L>,
    policy: FailPolicy,
    scheme: CredentialScheme,
}

impl Gate<DefaultLogger> {
    /// Build a gate with the built-in logger at `config.log_level`.
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        let logger = Arc::new(DefaultLogger::new(config.log_level));
        Self::with_logger(config, logger)
    }

    /// Change the built-in logger's threshold. Takes effect immediately,
    /// including for checks already in flight.
    pub fn set_log_level(&self, level: LogLevel) {
        self.logger.set_level(level);
    }

    /// Current threshold of the built-in logger.
    pub fn log_level(&self) -> LogLevel {
        self.logger.level()
    }
}

impl<L: Logger + 'static> Gate<L> {
    /// Build a gate that reports through `logger`.
    pub fn with_logger(config: GateConfig, logger: Arc<L>) -> Result<Self, GateError> {
        let client = DecisionClient::new(&config, logger.clone())?;
        Ok(Self::with_checker(&config, logger, Arc::new(client)))
    }

    /// Build a gate over an arbitrary checker. The endpoint in `config` is unused.
    pub fn with_checker(
        config: &GateConfig,
        logger: Arc<L>,
        checker: Arc<dyn AccessCheck>,
    ) -> Self {
        Self {
            checker,
            logger,
            policy: FailPolicy::new(config.allow_on_failure),
            scheme: config.credential_scheme,
        }
    }
}

impl<L: Logger> Gate<L> {
    /// Credential headers this gate reads.
    pub fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    /// Failure policy this gate applies.
    pub fn policy(&self) -> FailPolicy {
        self.policy
    }

    /// Logger this gate reports through.
    pub fn logger(&self) -> &Arc<L> {
        &self.logger
    }

    /// Layer that only lets requests through when `action` is allowed.
    pub fn require_action(&self, action: impl Into<String>) -> RequireActionLayer<L> {
        RequireActionLayer::new(self.clone(), action)
    }

    /// Decide whether a request carrying `headers` may perform `action`.
    ///
    /// `Ok` means the request continues: either access was granted, or the
    /// check failed and the policy is fail-open. Missing credentials are
    /// rejected before any remote call.
    pub async fn enforce(
        &self,
        action: &str,
        headers: &HeaderMap,
    ) -> Result<Verdict, GateRejection> {
        let credentials = match Credentials::from_headers(self.scheme, headers) {
            Ok(credentials) => credentials,
            Err(err) => {
                log_info!(self.logger, "Rejecting request for action {}: {}", action, err);
                return Err(err.into());
            }
        };

        match self.evaluate(action, &credentials).await {
            Verdict::Denied => Err(GateRejection::AccessDenied),
            Verdict::OperationalError {
                fail_open: false, ..
            } => Err(GateRejection::CheckFailed),
            verdict => Ok(verdict),
        }
    }

    /// Run the remote check for valid credentials and resolve it through the policy.
    pub async fn evaluate(&self, action: &str, credentials: &Credentials) -> Verdict {
        let span = check_span(action, credentials.scheme().as_str());
        let outcome = instrument_future(self.checker.check(action, credentials), span).await;
        let verdict = Verdict::resolve(self.policy, outcome);

        match &verdict {
            Verdict::Granted => log_info!(self.logger, "Access granted for action {}", action),
            Verdict::Denied => log_info!(self.logger, "Access denied for action {}", action),
            Verdict::OperationalError { error, fail_open } => log_error!(
                self.logger,
                "Failed to check access for action {} (allow_on_failure={}): {}",
                action,
                fail_open,
                error
            ),
        }

        verdict
    }

    /// Whether `credentials` may perform `action`.
    ///
    /// Incomplete credentials yield `false` without a remote call, whatever
    /// the policy.
    pub async fn query(&self, action: &str, credentials: &Credentials) -> bool {
        if let Err(err) = credentials.validate() {
            log_info!(
                self.logger,
                "Access query for action {} without credentials: {}",
                action,
                err
            );
            return false;
        }

        self.evaluate(action, credentials).await.is_allowed()
    }

    /// Like [`Gate::query`], reading credentials from request headers.
    pub async fn query_headers(&self, action: &str, headers: &HeaderMap) -> bool {
        match Credentials::from_headers(self.scheme, headers) {
            Ok(credentials) => self.evaluate(action, &credentials).await.is_allowed(),
            Err(err) => {
                log_info!(
                    self.logger,
                    "Access query for action {} without credentials: {}",
                    action,
                    err
                );
                false
            }
        }
    }
}

impl<L: Logger> Clone for Gate<L> {
    fn clone(&self) -> Self {
        Self {
            checker: self.checker.clone(),
            logger: self.logger.clone(),
            policy: self.policy,
            scheme: self.scheme,
        }
    }
}

impl<L: Logger> std::fmt::Debug for Gate<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("policy", &self.policy)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
