//! HTTP request types and builders.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Header names understood by the access service.
pub mod headers {
    pub const X_AUTHENTIK_JWT: &str = "x-authentik-jwt";
    pub const X_AUTHENTIK_ENTITLEMENTS: &str = "x-authentik-entitlements";
    pub const APPLICATION: &str = "application";
}

/// Headers and query parameters for one outbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    headers: HeaderMap,
    query: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Create an empty request builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Names or values that are not valid HTTP are skipped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a sensitive header; its value is hidden from `Debug` output.
    pub fn sensitive_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(mut value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            value.set_sensitive(true);
            self.headers.insert(name, value);
        }
        self
    }

    /// Append a query parameter. Encoding happens when the request is sent.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Get the built headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the query parameters in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}
