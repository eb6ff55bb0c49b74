//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::scheduling::SchedulingError;

// Errors

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        let Some(err) = self.0.downcast_ref::<SchedulingError>() else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal");
        };
        let status = match err {
            SchedulingError::Validation(_) | SchedulingError::UnknownLawyer(_) => {
                StatusCode::BAD_REQUEST
            }
            SchedulingError::InvalidManualSlot { .. } => StatusCode::CONFLICT,
            SchedulingError::NoAvailableSlot { .. } => StatusCode::NOT_FOUND,
            SchedulingError::UpstreamIo(_) => StatusCode::BAD_GATEWAY,
        };
        (status, err.kind())
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        // Always log the error
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }

        let body = ErrorResponse {
            error: kind.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` or `Result<_, SchedulingError>` to turn them into
/// `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod slots {
    pub use crate::api::routes::slots::public::*;
}
