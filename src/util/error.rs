use axum::{response::{IntoResponse, Response}, http::StatusCode};
use tracing::error;

use crate::dto::quote_dto::QuoteResponse;
use crate::util::email::EmailError;
use crate::util::sheets::SheetsError;

/// Generic message returned for 5xx responses; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    Validation,
    Internal,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!("Internal error while handling request: {}", detail);
        HandlerError {
            error: HandlerErrorKind::Internal,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::Validation => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(QuoteResponse::failure(self.message));
        (status, body).into_response()
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => HandlerError {
                error: HandlerErrorKind::Validation,
                message,
            },
        }
    }
}


#[derive(Debug, Clone)]
pub enum ServiceError {
    InvalidInput(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
        }
    }
}
impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Failure of a best-effort side effect. Never surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    #[error("{dependency} timed out after {secs}s")]
    Timeout { dependency: &'static str, secs: u64 },

    #[error("{dependency} task failed: {reason}")]
    TaskFailed { dependency: &'static str, reason: String },
}
