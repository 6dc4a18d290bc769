//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use castagents_types::error::{SessionError, SubmitRejected};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Rejected conversation operation.
    Session(SessionError),
    /// Unknown session id.
    SessionNotFound(String),
    /// Malformed path or body.
    Validation(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(SessionError::Rejected(SubmitRejected::Busy))
            | AppError::Session(SessionError::PersonaSwitchWhileSending) => {
                (StatusCode::CONFLICT, "SESSION_BUSY", self.message())
            }
            AppError::Session(SessionError::Rejected(SubmitRejected::BlankInput)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.message())
            }
            AppError::Session(SessionError::StaleCompletion { .. }) => {
                (StatusCode::CONFLICT, "STALE_COMPLETION", self.message())
            }
            AppError::Session(SessionError::PersonaNotFound(_)) => {
                (StatusCode::NOT_FOUND, "PERSONA_NOT_FOUND", self.message())
            }
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session not found: {id}"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Session(e) => e.to_string(),
            AppError::SessionNotFound(id) => id.clone(),
            AppError::Validation(msg) | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        } else {
            tracing::debug!(code, %message, "Request rejected");
        }

        let mut response = ApiResponse::failure(code, &message).into_response();
        *response.status_mut() = status;
        response
    }
}
