//! Error types for the tour API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The body
//! is always `{"error": <message>, "status": <code>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use geotour_core::{StoreError, TourError};
use geotour_types::{SessionId, StopId};

/// Errors that can occur in the tour API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or path is missing fields or has bad values.
    #[error("validation error: {0}")]
    Validation(String),

    /// The session identifier is unknown.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The stop identifier is unknown.
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// The storage backend failed or timed out. Safe to retry.
    #[error("storage unavailable: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) | Self::StopNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<TourError> for ApiError {
    fn from(err: TourError) -> Self {
        match err {
            TourError::SessionNotFound(id) => Self::SessionNotFound(id),
            TourError::StopNotFound(id) => Self::StopNotFound(id),
            TourError::InvalidCoordinates { .. } => Self::Validation(err.to_string()),
            TourError::Storage { source } => Self::Storage(source),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(msg) => msg.clone(),
            Self::SessionNotFound(_) => String::from("Session not found"),
            Self::StopNotFound(id) => format!("Stop {id} not found"),
            Self::Storage(e) => {
                tracing::error!(error = %e, "Storage failure while serving request");
                String::from("Storage temporarily unavailable")
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_errors_map_to_status_codes() {
        let cases = [
            (
                ApiError::from(TourError::SessionNotFound(SessionId::new())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(TourError::StopNotFound(StopId::from("x"))),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(TourError::InvalidCoordinates {
                    lat: 91.0,
                    lng: 0.0,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(TourError::from(StoreError::Timeout {
                    operation: "get_session",
                    timeout_ms: 3000,
                })),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected);
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
