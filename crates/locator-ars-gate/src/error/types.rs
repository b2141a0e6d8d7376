//! Gate error types.

use crate::config::ConfigError;
use axum::http::StatusCode;
use locator_ars_common_http::{HttpError, ResponseError};
use thiserror::Error;

/// A required credential header is absent or empty.
///
/// Local validation failure: always rejected, whatever the failure policy.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing X-Authentik-Jwt header")]
    MissingJwt,

    #[error("Missing Application header")]
    MissingApplication,

    #[error("Missing X-Authentik-Entitlements header")]
    MissingEntitlements,
}

/// The remote check could not produce a decision.
///
/// These are the only errors the failure policy applies to.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Connection refused, DNS failure, timeout, or body read failure.
    #[error("access service unreachable: {0}")]
    Transport(#[source] HttpError),

    #[error("access service returned non-200 status: {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("malformed access service response: {0}")]
    MalformedResponse(#[source] ResponseError),
}

impl From<HttpError> for CheckError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::UnexpectedStatus { status, body } => Self::UnexpectedStatus { status, body },
            other => Self::Transport(other),
        }
    }
}

impl From<ResponseError> for CheckError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Read(e) => Self::Transport(HttpError::from(e)),
            parse => Self::MalformedResponse(parse),
        }
    }
}

/// Failure to build a gate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid gate configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error(transparent)]
    Http(#[from] HttpError),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why the enforcement point short-circuited a request.
#[derive(Debug, Error)]
pub enum GateRejection {
    #[error(transparent)]
    MissingCredential(#[from] CredentialError),

    #[error("Access denied")]
    AccessDenied,

    #[error("Failed to check access")]
    CheckFailed,
}

impl GateRejection {
    /// HTTP status for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential(CredentialError::MissingApplication) => StatusCode::BAD_REQUEST,
            Self::MissingCredential(_) => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::CheckFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable reason.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential(CredentialError::MissingJwt) => "missing_jwt",
            Self::MissingCredential(CredentialError::MissingApplication) => "missing_application",
            Self::MissingCredential(CredentialError::MissingEntitlements) => "missing_entitlements",
            Self::AccessDenied => "access_denied",
            Self::CheckFailed => "access_check_failed",
        }
    }
}
