//! Axum request handlers for the secure listener.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tracing::error;

use super::state::AppState;
use crate::digest::DigestError;

/// Content type of the checksum report.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A [`ServiceError`] rendered as a JSON [`ErrorResponse`] with the mapped status.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<DigestError> for ServiceError {
    fn from(err: DigestError) -> Self {
        match err {
            DigestError::Unsupported { .. } => ServiceError::HashUnavailable(err.to_string()),
            DigestError::Malformed { .. } => ServiceError::Internal(err.to_string()),
        }
    }
}

/// `GET /hash` — the payload name, data, and SHA-256 checksum of the data.
///
/// Returns `500` with an [`ErrorResponse`] if the digest cannot be computed.
/// The failure is environmental, so it is logged and not retried.
pub async fn hash(State(state): State<AppState>) -> Response {
    match state.report() {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TEXT_PLAIN)],
            report.render(),
        )
            .into_response(),
        Err(e) => {
            error!(
                algorithm = state.digester.algorithm(),
                error = %e,
                "checksum computation failed"
            );
            ApiError(e.into()).into_response()
        }
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
