//! Outgoing mail types for formrelay.

use std::path::PathBuf;

/// Body of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBody {
    /// Plain text body.
    Text(String),
    /// HTML body.
    Html(String),
}

impl MailBody {
    /// Get the raw body content.
    pub fn content(&self) -> &str {
        match self {
            MailBody::Text(s) | MailBody::Html(s) => s,
        }
    }
}

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    /// Filename presented to the recipient.
    pub filename: String,
    /// Location of the content on disk.
    pub path: PathBuf,
}

impl MailAttachment {
    /// Create a new attachment.
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

/// A message handed to a [`MailSender`](super::MailSender).
///
/// Built by a handler, consumed once by the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender mailbox.
    pub from: String,
    /// Reply-To mailbox (the submitter).
    pub reply_to: String,
    /// Recipient mailbox.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: MailBody,
    /// Attachments, in presentation order.
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingMessage {
    /// Create a message from the service mailbox to itself, replying to `reply_to`.
    pub fn to_service_mailbox(
        mailbox: impl Into<String>,
        reply_to: impl Into<String>,
        subject: impl Into<String>,
        body: MailBody,
    ) -> Self {
        let mailbox = mailbox.into();
        Self {
            from: mailbox.clone(),
            reply_to: reply_to.into(),
            to: mailbox,
            subject: subject.into(),
            body,
            attachments: Vec::new(),
        }
    }

    /// Attach files to the message.
    pub fn with_attachments(mut self, attachments: Vec<MailAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}
