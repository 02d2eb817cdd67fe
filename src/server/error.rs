use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::PubMedError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

/// Boundary wrapper that renders a [`PubMedError`] as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub PubMedError);

impl From<PubMedError> for ApiError {
    fn from(err: PubMedError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            PubMedError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            PubMedError::AbstractsNotFound { .. } => StatusCode::NOT_FOUND,
            PubMedError::RequestError(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            PubMedError::RequestError(_)
            | PubMedError::ApiError { .. }
            | PubMedError::JsonError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Upstream failure");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let upstream_status = match &self.0 {
            PubMedError::ApiError { status, .. } => Some(*status),
            _ => None,
        };

        let body = ErrorBody {
            detail: self.0.to_string(),
            upstream_status,
        };

        (status, Json(body)).into_response()
    }
}
