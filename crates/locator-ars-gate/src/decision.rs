//! Access decisions and the failure policy that resolves them.

use crate::credentials::Credentials;
use crate::error::CheckError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Payload returned by the access service.
///
/// Only `allowed` drives the decision; a missing or `null` field means `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessResponse {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub allowed: bool,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Map<String, serde_json::Value>>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed outcome of a successful remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub raw_message: Option<String>,
}

impl From<AccessResponse> for AccessDecision {
    fn from(response: AccessResponse) -> Self {
        Self {
            allowed: response.allowed,
            raw_message: response.message,
        }
    }
}

/// Result of one remote call, before any policy is applied.
#[derive(Debug)]
pub enum Decision {
    Allowed(AccessDecision),
    Denied(AccessDecision),
    /// The call failed before a decision could be parsed.
    Unknown(CheckError),
}

impl Decision {
    /// Classify a parsed response.
    pub fn from_response(response: AccessResponse) -> Self {
        let decision = AccessDecision::from(response);
        if decision.allowed {
            Self::Allowed(decision)
        } else {
            Self::Denied(decision)
        }
    }
}

/// A suggested allow/deny value together with the error that forced it, if any.
#[derive(Debug)]
pub struct CheckOutcome {
    pub allowed: bool,
    pub error: Option<CheckError>,
}

impl CheckOutcome {
    /// Outcome of a parsed decision.
    pub fn decided(allowed: bool) -> Self {
        Self {
            allowed,
            error: None,
        }
    }

    /// Outcome of a failed call. Starts out denied until a policy opens it.
    pub fn failed(error: CheckError) -> Self {
        Self {
            allowed: false,
            error: Some(error),
        }
    }
}

impl From<Decision> for CheckOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allowed(_) => Self::decided(true),
            Decision::Denied(_) => Self::decided(false),
            Decision::Unknown(error) => Self::failed(error),
        }
    }
}

/// Fail-open or fail-closed resolution of remote-check errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailPolicy {
    allow_on_failure: bool,
}

impl FailPolicy {
    pub fn new(allow_on_failure: bool) -> Self {
        Self { allow_on_failure }
    }

    pub fn fail_open() -> Self {
        Self::new(true)
    }

    pub fn fail_closed() -> Self {
        Self::new(false)
    }

    pub fn allow_on_failure(self) -> bool {
        self.allow_on_failure
    }

    /// Resolve a failed outcome; decided outcomes pass through untouched.
    ///
    /// Idempotent: the result depends only on whether an error is present.
    pub fn apply(self, outcome: CheckOutcome) -> CheckOutcome {
        match outcome.error {
            Some(error) => CheckOutcome {
                allowed: self.allow_on_failure,
                error: Some(error),
            },
            None => outcome,
        }
    }
}

/// What the gate concluded for one request.
#[derive(Debug)]
pub enum Verdict {
    Granted,
    Denied,
    /// The remote check failed; `fail_open` is what the policy resolved it to.
    OperationalError { error: CheckError, fail_open: bool },
}

impl Verdict {
    /// Build a verdict from an outcome that already went through `policy`.
    pub fn resolve(policy: FailPolicy, outcome: CheckOutcome) -> Self {
        let outcome = policy.apply(outcome);
        match outcome.error {
            Some(error) => Self::OperationalError {
                error,
                fail_open: outcome.allowed,
            },
            None if outcome.allowed => Self::Granted,
            None => Self::Denied,
        }
    }

    /// Whether the request may proceed.
    pub fn is_allowed(&self) -> bool {
        match self {
            Self::Granted => true,
            Self::Denied => false,
            Self::OperationalError { fail_open, .. } => *fail_open,
        }
    }
}

/// Something that can answer an access question for a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessCheck: Send + Sync {
    /// Check `action` for `credentials`, with the failure policy already applied.
    async fn check(&self, action: &str, credentials: &Credentials) -> CheckOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_ars_common_http::HttpError;
    use proptest::prelude::*;

    fn outcome(allowed: bool, failed: bool) -> CheckOutcome {
        CheckOutcome {
            allowed,
            error: failed.then(|| CheckError::Transport(HttpError::Timeout)),
        }
    }

    #[test]
    fn test_missing_allowed_field_is_false() {
        let response: AccessResponse =
            serde_json::from_str(r#"{"action": "view", "entity": "report"}"#).unwrap();
        assert!(!response.allowed);
        assert!(matches!(Decision::from_response(response), Decision::Denied(_)));
    }

    #[test]
    fn test_null_allowed_is_false() {
        let response: AccessResponse =
            serde_json::from_str(r#"{"action": "view", "allowed": null}"#).unwrap();
        assert!(!response.allowed);
        assert!(matches!(Decision::from_response(response), Decision::Denied(_)));
    }

    #[test]
    fn test_null_body_is_a_denial() {
        let response: Option<AccessResponse> = serde_json::from_str("null").unwrap();
        let response = response.unwrap_or_default();
        assert!(matches!(Decision::from_response(response), Decision::Denied(_)));
    }

    #[test]
    fn test_full_payload() {
        let response: AccessResponse = serde_json::from_str(
            r#"{"action": "view", "allowed": true, "entity": "report",
                "message": "ok", "user": {"id": 7}, "extra": 1}"#,
        )
        .unwrap();
        match Decision::from_response(response) {
            Decision::Allowed(decision) => {
                assert!(decision.allowed);
                assert_eq!(decision.raw_message.as_deref(), Some("ok"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_decision_starts_denied() {
        let error = CheckError::Transport(HttpError::Timeout);
        let outcome = CheckOutcome::from(Decision::Unknown(error));
        assert!(!outcome.allowed);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_policy_leaves_decisions_alone() {
        assert!(!FailPolicy::fail_open().apply(outcome(false, false)).allowed);
        assert!(FailPolicy::fail_closed().apply(outcome(true, false)).allowed);
    }

    #[test]
    fn test_policy_resolves_failures() {
        assert!(FailPolicy::fail_open().apply(outcome(false, true)).allowed);
        assert!(!FailPolicy::fail_closed().apply(outcome(true, true)).allowed);
    }

    #[test]
    fn test_verdict_from_outcomes() {
        let closed = FailPolicy::fail_closed();
        assert!(matches!(Verdict::resolve(closed, outcome(true, false)), Verdict::Granted));
        assert!(matches!(Verdict::resolve(closed, outcome(false, false)), Verdict::Denied));

        let verdict = Verdict::resolve(closed, outcome(true, true));
        assert!(matches!(verdict, Verdict::OperationalError { fail_open: false, .. }));
        assert!(!verdict.is_allowed());

        let verdict = Verdict::resolve(FailPolicy::fail_open(), outcome(false, true));
        assert!(verdict.is_allowed());
    }

    proptest! {
        #[test]
        fn applying_policy_twice_equals_once(
            allow_on_failure in any::<bool>(),
            allowed in any::<bool>(),
            failed in any::<bool>(),
        ) {
            let policy = FailPolicy::new(allow_on_failure);
            let once = policy.apply(outcome(allowed, failed));
            let twice = policy.apply(policy.apply(outcome(allowed, failed)));
            prop_assert_eq!(once.allowed, twice.allowed);
            prop_assert_eq!(once.error.is_some(), twice.error.is_some());
        }

        #[test]
        fn failed_outcome_equals_policy(
            allow_on_failure in any::<bool>(),
            suggested in any::<bool>(),
        ) {
            let resolved = FailPolicy::new(allow_on_failure).apply(outcome(suggested, true));
            prop_assert_eq!(resolved.allowed, allow_on_failure);
        }
    }
}
