//! formrelay - contact form and job application relay.
//!
//! A small HTTP service that forwards contact form submissions and job
//! applications (with uploaded documents) to a service mailbox over SMTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod upload;
pub mod web;

pub use config::Config;
pub use error::{RelayError, Result};
pub use mail::{MailAttachment, MailBody, MailError, MailSender, OutgoingMessage, SmtpMailSender};
pub use upload::{DocumentField, Intake, IntakeError, UploadStorage, UploadedDocument};
pub use web::{create_router, AppState, WebServer};
