//! HTTP client configuration.

use crate::request::RequestBuilder;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout, covering connect, send and body read.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(5),
            user_agent: format!("locator-ars/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: HttpConfig) -> Result<Client, HttpError> {
    ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build()
        .map_err(HttpError::ClientBuild)
}

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status: {status}")]
    UnexpectedStatus { status: u16, body: String },
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_connect() {
            HttpError::Connect(e)
        } else if e.is_builder() {
            HttpError::InvalidUrl(e.to_string())
        } else {
            HttpError::Request(e)
        }
    }
}

/// Shared HTTP client.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a new HTTP client with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let inner = build_client(config)?;
        Ok(Self { inner })
    }

    /// Make a GET request with the headers and query of `request`.
    pub async fn get(
        &self,
        url: &str,
        request: &RequestBuilder,
    ) -> Result<reqwest::Response, HttpError> {
        tracing::debug!("Making GET request to: {}", url);
        let response = self
            .inner
            .get(url)
            .query(request.query())
            .headers(request.headers().clone())
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!("GET response: {} {}", response.status(), url);
        Ok(response)
    }

    /// Reject any status other than `expected`, keeping the body for diagnostics.
    pub async fn expect_status(
        response: reqwest::Response,
        expected: StatusCode,
    ) -> Result<reqwest::Response, HttpError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(HttpError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}
