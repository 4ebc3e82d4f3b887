//! API error handling for formrelay.
//!
//! Every failure reaches the client as `{"message": "..."}` with a 400 or
//! 500 status. Details stay in the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::upload::IntakeError;

/// Message for a submission missing a required field.
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// Message for a body that is not valid JSON.
pub const INVALID_JSON_BODY: &str = "Invalid JSON body";

/// Message for a body that is not valid multipart data.
pub const INVALID_MULTIPART: &str = "Invalid multipart data";

/// Message for a panicking handler.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create the error for a submission missing required fields.
    pub fn missing_fields() -> Self {
        Self::bad_request(MISSING_REQUIRED_FIELDS)
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        let message = match &err {
            IntakeError::UnexpectedField(_) | IntakeError::DuplicateField(_) => "Unexpected field",
            IntakeError::UnsupportedFileType { .. } => "Only .pdf, .jpg, .jpeg, .png allowed",
            IntakeError::FileTooLarge { .. } => "File too large",
            IntakeError::Malformed(_) => INVALID_MULTIPART,
            IntakeError::Io(_) => {
                tracing::error!("Upload staging failed: {}", err);
                return ApiError::internal("Failed to process application");
            }
        };
        tracing::warn!("Upload rejected: {}", err);
        ApiError::bad_request(message)
    }
}
