//! Error handling for the gate.

pub mod response;
pub mod types;

pub use types::{CheckError, CredentialError, GateError, GateRejection};
