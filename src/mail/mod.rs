//! Outbound mail for formrelay.
//!
//! Handlers build an [`OutgoingMessage`] and hand it to a [`MailSender`].
//! The production sender relays through SMTP with `lettre`:
//! - connection verification before each send
//! - plain text or HTML bodies
//! - file attachments read from the upload staging directory

mod sender;
mod types;

pub use sender::{build_message, MailSender, SmtpMailSender};
pub use types::{MailAttachment, MailBody, OutgoingMessage};

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while delivering a message.
#[derive(Debug, Error)]
pub enum MailError {
    /// A mailbox could not be parsed.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// An attachment could not be read from disk.
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        /// Path of the attachment.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The relay is unreachable or rejected the connection.
    #[error("SMTP relay unavailable: {0}")]
    Unreachable(String),

    /// The relay failed to accept the message.
    #[error("SMTP error: {0}")]
    Smtp(String),
}
