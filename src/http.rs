//! HTTP surface: a single `POST /summary` endpoint.
//!
//! The response body on success is exactly the column → summary mapping. Errors are returned as
//! `{"detail": "<message>"}` with status 400 (validation), 404 (no rows matched) or 500.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::SummaryError;
use crate::processing::SummaryResult;
use crate::request::SummaryRequest;
use crate::service::SummaryService;

/// Error body shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A [`SummaryError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub SummaryError);

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Router exposing `POST /summary`.
pub fn router(service: Arc<SummaryService>) -> Router {
    Router::new()
        .route("/summary", post(summary_handler))
        .with_state(service)
}

/// `POST /summary`.
///
/// An empty body is the default request (every column, no filters).
pub async fn summary_handler(
    State(service): State<Arc<SummaryService>>,
    body: Bytes,
) -> Result<Json<SummaryResult>, ApiError> {
    let request = parse_request(&body)?;

    // Filtering and statistics are CPU-bound; keep them off the async workers.
    let summary = tokio::task::spawn_blocking(move || service.summarize(&request))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "summary task failed");
            SummaryError::internal(e.to_string())
        })??;

    Ok(Json(summary))
}

fn parse_request(body: &[u8]) -> Result<SummaryRequest, SummaryError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SummaryRequest::default());
    }
    let request: Option<SummaryRequest> = serde_json::from_slice(body)
        .map_err(|e| SummaryError::validation(format!("Invalid request body: {e}")))?;
    Ok(request.unwrap_or_default())
}
