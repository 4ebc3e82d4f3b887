//! API handlers for formrelay.

pub mod application;
pub mod contact;

pub use application::*;
pub use contact::*;

use std::sync::Arc;

use crate::config::Config;
use crate::mail::MailSender;
use crate::upload::{Intake, UploadStorage};
use crate::Result;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Outbound mail relay.
    pub mailer: Arc<dyn MailSender>,
    /// Upload intake and staging.
    pub intake: Intake,
    /// Service mailbox: sender and recipient of every message.
    pub mailbox: String,
    /// Remove staged uploads when sending an application fails.
    pub cleanup_on_failure: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(mailer: Arc<dyn MailSender>, intake: Intake, mailbox: impl Into<String>) -> Self {
        Self {
            mailer,
            intake,
            mailbox: mailbox.into(),
            cleanup_on_failure: false,
        }
    }

    /// Build the state from configuration, creating the staging directory.
    pub fn from_config(config: &Config, mailer: Arc<dyn MailSender>) -> Result<Self> {
        let storage = UploadStorage::new(&config.uploads.dir)?;
        tracing::info!("Upload staging directory: {}", config.uploads.dir);

        let intake = Intake::new(storage, config.uploads.max_file_size_bytes);
        Ok(Self::new(mailer, intake, &config.mail.user)
            .with_cleanup_on_failure(config.uploads.cleanup_on_failure))
    }

    /// Set whether staged uploads are removed after a failed send.
    pub fn with_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }
}
