//! Mail sender abstraction and SMTP implementation.

use axum::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailBody, MailError, OutgoingMessage};
use crate::config::MailConfig;

/// Port served with STARTTLS instead of implicit TLS.
const STARTTLS_PORT: u16 = 587;

/// Delivers outgoing messages.
///
/// `send` completes only once the relay has accepted or rejected the
/// message; callers respond to their own clients afterwards.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver a message. Called once per message, never retried.
    async fn send(&self, message: OutgoingMessage) -> Result<(), MailError>;
}

/// SMTP relay sender backed by a pooled `lettre` transport.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailSender {
    /// Create a sender for the configured relay.
    ///
    /// No connection is made here; the relay is verified on every send.
    /// Must be called inside a Tokio runtime: the connection pool spawns its
    /// maintenance task on construction.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.smtp_port == STARTTLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| MailError::Smtp(e.to_string()))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();

        Ok(Self {
            transport,
            host: config.smtp_host.clone(),
        })
    }

    /// Check that the relay accepts connections with our credentials.
    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Unreachable(format!(
                "{} did not accept the connection",
                self.host
            ))),
            Err(e) => Err(MailError::Unreachable(e.to_string())),
        }
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, message: OutgoingMessage) -> Result<(), MailError> {
        self.verify().await?;
        tracing::info!(relay = %self.host, "SMTP server is ready to send messages");

        let email = build_message(&message).await?;
        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("{address}: {e}")))
}

fn content_type_for(filename: &str) -> Result<ContentType, MailError> {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    ContentType::parse(mime.as_ref()).map_err(|e| MailError::Build(e.to_string()))
}

/// Assemble a MIME message, reading attachments from disk.
pub async fn build_message(message: &OutgoingMessage) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(parse_mailbox(&message.from)?)
        .reply_to(parse_mailbox(&message.reply_to)?)
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.clone());

    let body = match &message.body {
        MailBody::Text(text) => SinglePart::plain(text.clone()),
        MailBody::Html(html) => SinglePart::html(html.clone()),
    };

    let result = if message.attachments.is_empty() {
        builder.singlepart(body)
    } else {
        let mut parts = MultiPart::mixed().singlepart(body);
        for attachment in &message.attachments {
            let content = tokio::fs::read(&attachment.path)
                .await
                .map_err(|source| MailError::Attachment {
                    path: attachment.path.clone(),
                    source,
                })?;
            let content_type = content_type_for(&attachment.filename)?;
            parts = parts.singlepart(
                Attachment::new(attachment.filename.clone()).body(content, content_type),
            );
        }
        builder.multipart(parts)
    };

    result.map_err(|e| MailError::Build(e.to_string()))
}
