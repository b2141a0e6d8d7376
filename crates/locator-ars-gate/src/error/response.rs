//! Rejection response implementation.

use super::types::GateRejection;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Rejection body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
struct RejectionBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            error: self.to_string(),
            code: self.error_code(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
