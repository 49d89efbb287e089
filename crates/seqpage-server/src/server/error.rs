//! Request-level errors of the HTTP endpoint.
//!
//! Each variant maps to one status code, mirroring how the service layer maps
//! its own failures:
//!
//! - `Misconfigured` -> 500, raised before any external call.
//! - `UnknownDatabase` -> 404.
//! - `CountTooLarge` -> 400, raised before any external call.
//!
//! The body always has the shape of a failed
//! [`CreationResult`](seqpage::CreationResult).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seqpage::CreationResult;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Startup configuration is incomplete.
    #[error("Server misconfigured: missing {}", .missing.join(", "))]
    Misconfigured { missing: Vec<&'static str> },

    /// The `db` selector names no registered database.
    #[error("Unknown database '{selector}'")]
    UnknownDatabase { selector: String },

    /// The requested count exceeds the per-request limit.
    #[error("Refusing to create more than {limit} pages in one request")]
    CountTooLarge { count: i64, limit: u32 },
}

impl EndpointError {
    pub fn status(&self) -> StatusCode {
        match self {
            EndpointError::Misconfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            EndpointError::UnknownDatabase { .. } => StatusCode::NOT_FOUND,
            EndpointError::CountTooLarge { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        (self.status(), Json(CreationResult::failed(self.to_string()))).into_response()
    }
}
