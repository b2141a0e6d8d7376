//! Client for the remote access service.

use crate::config::{validate_config, GateConfig};
use crate::credentials::Credentials;
use crate::decision::{AccessCheck, AccessResponse, CheckOutcome, Decision, FailPolicy};
use crate::error::{CheckError, GateError};
use async_trait::async_trait;
use locator_ars_common_http::{parse_json, HttpClient, HttpConfig, RequestBuilder, StatusCode};
use locator_ars_common_log::spans::{instrument_future, remote_span, Timer};
use locator_ars_common_log::{log_debug, log_error, log_info, Logger};
use std::sync::Arc;
use url::Url;

/// Asks the access service whether credentials may perform an action.
///
/// One GET per check, with the action as a query parameter and the
/// credentials as headers. Anything other than a 200 with a JSON body counts
/// as a failure.
#[derive(Clone)]
pub struct DecisionClient {
    http: HttpClient,
    endpoint: Url,
    policy: FailPolicy,
    logger: Arc<dyn Logger>,
}

impl DecisionClient {
    /// Build a client from validated configuration.
    pub fn new(config: &GateConfig, logger: Arc<dyn Logger>) -> Result<Self, GateError> {
        let endpoint = validate_config(config).map_err(GateError::InvalidConfig)?;
        let http = HttpClient::with_config(HttpConfig {
            connect_timeout: config.request_timeout(),
            request_timeout: config.request_timeout(),
            ..HttpConfig::default()
        })?;

        Ok(Self {
            http,
            endpoint,
            policy: FailPolicy::new(config.allow_on_failure),
            logger,
        })
    }

    /// Endpoint this client calls.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Failure policy applied by [`DecisionClient::check_access`].
    pub fn policy(&self) -> FailPolicy {
        self.policy
    }

    /// Make one remote call and classify the result. No policy is applied.
    pub async fn decide(&self, action: &str, credentials: &Credentials) -> Decision {
        let span = remote_span(self.endpoint.as_str());
        instrument_future(self.decide_inner(action, credentials), span).await
    }

    async fn decide_inner(&self, action: &str, credentials: &Credentials) -> Decision {
        let request = credentials.apply(RequestBuilder::new().query_param("action", action));

        log_debug!(
            self.logger,
            "Checking access: url={}?action={} scheme={} application={} credentials={:?}",
            self.endpoint,
            action,
            credentials.scheme().as_str(),
            credentials.application(),
            credentials
        );

        let timer = Timer::start("access_check");
        match self.call(&request).await {
            Ok((status, body, response)) => {
                log_debug!(
                    self.logger,
                    "Access service responded in {}ms: status={} body={}",
                    timer.elapsed_ms(),
                    status,
                    body
                );
                timer.finish();
                Decision::from_response(response)
            }
            Err(error) => {
                log_error!(
                    self.logger,
                    "Access check for action {} failed after {}ms: {}",
                    action,
                    timer.elapsed_ms(),
                    error
                );
                if let CheckError::UnexpectedStatus { body, .. } = &error {
                    log_debug!(self.logger, "Access service error body: {}", body);
                }
                timer.finish();
                Decision::Unknown(error)
            }
        }
    }

    async fn call(
        &self,
        request: &RequestBuilder,
    ) -> Result<(u16, String, AccessResponse), CheckError> {
        let response = self.http.get(self.endpoint.as_str(), request).await?;
        let response = HttpClient::expect_status(response, StatusCode::OK).await?;
        let status = response.status().as_u16();
        // A `null` body carries no grant.
        let body = parse_json::<Option<AccessResponse>>(response).await?;
        Ok((status, body.raw, body.value.unwrap_or_default()))
    }

    /// Check access with the failure policy applied.
    pub async fn check_access(&self, action: &str, credentials: &Credentials) -> CheckOutcome {
        let outcome = self.policy.apply(CheckOutcome::from(self.decide(action, credentials).await));
        if outcome.allowed && outcome.error.is_some() {
            log_info!(self.logger, "Access allowed on failure due to configuration");
        }
        outcome
    }
}

impl std::fmt::Debug for DecisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessCheck for DecisionClient {
    async fn check(&self, action: &str, credentials: &Credentials) -> CheckOutcome {
        self.check_access(action, credentials).await
    }
}
