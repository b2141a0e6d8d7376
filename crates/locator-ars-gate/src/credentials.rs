//! Identity credentials carried by inbound requests.

use crate::error::CredentialError;
use axum::http::{HeaderMap, HeaderValue};
use locator_ars_common_http::{headers, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application reported for entitlement tokens that name none.
pub const DEFAULT_APPLICATION: &str = "default";

/// Which credential headers a deployment uses. Chosen once, in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialScheme {
    /// `X-Authentik-Jwt` plus a required `Application`.
    #[default]
    JwtApplication,
    /// `X-Authentik-Entitlements` plus an optional `Application`.
    Entitlements,
}

impl CredentialScheme {
    /// Short name used in logs and spans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JwtApplication => "jwt_application",
            Self::Entitlements => "entitlements",
        }
    }
}

/// Identity material for one access check.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A JWT scoped to an application.
    JwtApplication { jwt: String, application: String },
    /// A pre-resolved entitlements token.
    Entitlements {
        entitlements: String,
        application: Option<String>,
    },
}

impl Credentials {
    /// JWT credentials.
    pub fn jwt(jwt: impl Into<String>, application: impl Into<String>) -> Self {
        Self::JwtApplication {
            jwt: jwt.into(),
            application: application.into(),
        }
    }

    /// Entitlements credentials without an application.
    pub fn entitlements(entitlements: impl Into<String>) -> Self {
        Self::Entitlements {
            entitlements: entitlements.into(),
            application: None,
        }
    }

    /// Attach an application to entitlements credentials. No-op for JWT
    /// credentials, whose application is always explicit.
    pub fn with_application(self, app: impl Into<String>) -> Self {
        match self {
            Self::Entitlements { entitlements, .. } => Self::Entitlements {
                entitlements,
                application: Some(app.into()),
            },
            other => other,
        }
    }

    /// Scheme these credentials belong to.
    pub fn scheme(&self) -> CredentialScheme {
        match self {
            Self::JwtApplication { .. } => CredentialScheme::JwtApplication,
            Self::Entitlements { .. } => CredentialScheme::Entitlements,
        }
    }

    /// Application the check is made for.
    pub fn application(&self) -> &str {
        match self {
            Self::JwtApplication { application, .. } => application,
            Self::Entitlements { application, .. } => application
                .as_deref()
                .filter(|app| !app.is_empty())
                .unwrap_or(DEFAULT_APPLICATION),
        }
    }

    /// Check that every required field is present and can be sent as a header.
    ///
    /// A value that is not a valid header value counts as missing.
    pub fn validate(&self) -> Result<(), CredentialError> {
        match self {
            Self::JwtApplication { jwt, application } => {
                if !is_sendable(jwt) {
                    return Err(CredentialError::MissingJwt);
                }
                if !is_sendable(application) {
                    return Err(CredentialError::MissingApplication);
                }
                Ok(())
            }
            Self::Entitlements {
                entitlements,
                application,
            } => {
                if !is_sendable(entitlements) {
                    return Err(CredentialError::MissingEntitlements);
                }
                match application.as_deref() {
                    Some(app) if !app.is_empty() && !is_sendable(app) => {
                        Err(CredentialError::MissingApplication)
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Extract and validate credentials of `scheme` from request headers.
    ///
    /// Headers that are absent, empty or not valid UTF-8 count as missing.
    pub fn from_headers(
        scheme: CredentialScheme,
        request_headers: &HeaderMap,
    ) -> Result<Self, CredentialError> {
        let credentials = match scheme {
            CredentialScheme::JwtApplication => Self::JwtApplication {
                jwt: header_value(request_headers, headers::X_AUTHENTIK_JWT).unwrap_or_default(),
                application: header_value(request_headers, headers::APPLICATION)
                    .unwrap_or_default(),
            },
            CredentialScheme::Entitlements => Self::Entitlements {
                entitlements: header_value(request_headers, headers::X_AUTHENTIK_ENTITLEMENTS)
                    .unwrap_or_default(),
                application: header_value(request_headers, headers::APPLICATION),
            },
        };

        credentials.validate()?;
        Ok(credentials)
    }

    /// Attach these credentials to an outbound request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::JwtApplication { jwt, application } => request
                .sensitive_header(headers::X_AUTHENTIK_JWT, jwt)
                .header(headers::APPLICATION, application),
            Self::Entitlements { entitlements, .. } => request
                .sensitive_header(headers::X_AUTHENTIK_ENTITLEMENTS, entitlements)
                .header(headers::APPLICATION, self.application()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JwtApplication { jwt, application } => f
                .debug_struct("JwtApplication")
                .field("jwt_present", &!jwt.is_empty())
                .field("application", application)
                .finish(),
            Self::Entitlements {
                entitlements,
                application,
            } => f
                .debug_struct("Entitlements")
                .field("entitlements_present", &!entitlements.is_empty())
                .field("application", application)
                .finish(),
        }
    }
}

fn is_sendable(value: &str) -> bool {
    !value.is_empty() && HeaderValue::from_str(value).is_ok()
}

fn header_value(request_headers: &HeaderMap, name: &str) -> Option<String> {
    request_headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}
