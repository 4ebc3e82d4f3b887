//! Error types for formrelay.

use thiserror::Error;

use crate::mail::MailError;

/// Common error type for formrelay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Mail relay error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}

/// Result type alias for formrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
