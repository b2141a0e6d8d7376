//! Inline authorization gate backed by the locator access service.
//!
//! A [`Gate`] reads identity headers from an inbound request, asks the access
//! service whether they may perform an action, and either lets the request
//! through or answers it with a JSON rejection:
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use locator_ars_gate::{Gate, GateConfig};
//!
//! # fn build() -> Result<Router, locator_ars_gate::GateError> {
//! let gate = Gate::new(GateConfig::default().with_allow_on_failure(false))?;
//! let app: Router = Router::new()
//!     .route("/reports", get(|| async { "reports" }))
//!     .route_layer(gate.require_action("viewallreports"));
//! # Ok(app)
//! # }
//! ```
//!
//! Missing credentials are always rejected. A failed remote check is resolved
//! by `allow_on_failure`: denied with a 500 when false, let through when true.

pub mod client;
pub mod config;
pub mod credentials;
pub mod decision;
pub mod error;
pub mod gate;
pub mod middleware;

pub use client::DecisionClient;
pub use config::{load_config, validate_config, ConfigError, ConfigLoader, GateConfig};
pub use credentials::{CredentialScheme, Credentials, DEFAULT_APPLICATION};
pub use decision::{
    AccessCheck, AccessDecision, AccessResponse, CheckOutcome, Decision, FailPolicy, Verdict,
};
pub use error::{CheckError, CredentialError, GateError, GateRejection};
pub use gate::Gate;
pub use middleware::{RequireActionLayer, RequireActionMiddleware};

pub use locator_ars_common_log::{DefaultLogger, LogLevel, Logger, TracingLogger};
