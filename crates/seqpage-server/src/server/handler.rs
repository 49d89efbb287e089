//! `GET /create-page` and `GET /health`.
//!
//! The create handler validates before it calls out:
//!
//! 1. incomplete configuration -> 500
//! 2. unknown `db` selector -> 404
//! 3. `count` above the limit -> 400
//!
//! and only then runs the page-creation service, answering 200 or 500 with
//! the service's result as the body.

use crate::server::error::EndpointError;
use crate::server::state::{AppState, Backend};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seqpage::CreatePages;
use serde::Serialize;

/// Query parameters of `GET /create-page`. A repeated key keeps its first
/// value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CreatePageParams {
    pub db: Option<String>,
    pub count: Option<String>,
}

impl FromIterator<(String, String)> for CreatePageParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "db" => &mut params.db,
                "count" => &mut params.count,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Parses `count`, falling back to 1 for anything that is not a positive
/// integer.
pub fn resolve_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

pub async fn create_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, EndpointError> {
    let params: CreatePageParams = pairs.into_iter().collect();
    let creator = match state.backend() {
        Backend::Ready(creator) => creator,
        Backend::Misconfigured(missing) => {
            tracing::error!(?missing, "Rejecting request: server misconfigured");
            return Err(EndpointError::Misconfigured {
                missing: missing.clone(),
            });
        }
    };

    let registry = state.registry();
    let database_id = registry.resolve(params.db.as_deref()).ok_or_else(|| {
        let selector = params
            .db
            .clone()
            .unwrap_or_else(|| registry.default_name().to_string());
        tracing::warn!(%selector, "Unknown database selector");
        EndpointError::UnknownDatabase { selector }
    })?;

    let count = resolve_count(params.count.as_deref());
    let limit = state.max_pages_per_request();
    if count > i64::from(limit) {
        tracing::warn!(count, limit, "Requested page count exceeds limit");
        return Err(EndpointError::CountTooLarge { count, limit });
    }
    let count = u32::try_from(count).map_err(|_| EndpointError::CountTooLarge { count, limit })?;

    let result = creator
        .create_pages(&CreatePages {
            database_id: database_id.to_string(),
            title_property: state.title_property().to_string(),
            count,
        })
        .await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)).into_response())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
    })
}
