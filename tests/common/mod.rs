//! Test helpers for Web API tests.
//!
//! Provides a recording mail sender and a TestServer wired to a temporary
//! upload directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum_test::TestServer;
use tempfile::TempDir;

use formrelay::upload::{Intake, UploadStorage, DEFAULT_MAX_FILE_SIZE};
use formrelay::{create_router, AppState, MailError, MailSender, OutgoingMessage};

/// Service mailbox used by test servers.
pub const SERVICE_MAILBOX: &str = "hr@example.com";

/// How the recording sender behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailerMode {
    /// Accept every message.
    Accept,
    /// Fail every message as if the relay were down.
    Fail,
    /// Panic inside `send`.
    Panic,
}

/// A message seen by the recording sender.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// The message as handed over by the handler.
    pub message: OutgoingMessage,
    /// Whether every attachment existed on disk at send time.
    pub attachments_on_disk: bool,
}

/// Mail sender that records every send attempt.
pub struct RecordingMailer {
    mode: MailerMode,
    attempts: Mutex<Vec<SentMessage>>,
}

impl RecordingMailer {
    /// Create a sender in the given mode.
    pub fn new(mode: MailerMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            attempts: Mutex::new(Vec::new()),
        })
    }

    /// Create a sender that accepts every message.
    pub fn accepting() -> Arc<Self> {
        Self::new(MailerMode::Accept)
    }

    /// Create a sender that fails every message.
    pub fn failing() -> Arc<Self> {
        Self::new(MailerMode::Fail)
    }

    /// All send attempts so far.
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, message: OutgoingMessage) -> Result<(), MailError> {
        let attachments_on_disk = message.attachments.iter().all(|a| a.path.exists());
        self.attempts.lock().unwrap().push(SentMessage {
            message,
            attachments_on_disk,
        });

        match self.mode {
            MailerMode::Accept => Ok(()),
            MailerMode::Fail => Err(MailError::Unreachable("relay down".to_string())),
            MailerMode::Panic => panic!("mailer exploded"),
        }
    }
}

/// A test server with its mailer and upload directory.
pub struct TestContext {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: TempDir,
}

impl TestContext {
    /// Files currently staged in the upload directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        list_files(self.upload_dir.path())
    }
}

/// List regular files in a directory, sorted.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Create a test server with default upload settings.
pub fn create_test_server(mailer: Arc<RecordingMailer>) -> TestContext {
    create_test_server_with(mailer, DEFAULT_MAX_FILE_SIZE, false)
}

/// Create a test server with custom upload settings.
pub fn create_test_server_with(
    mailer: Arc<RecordingMailer>,
    max_file_size: u64,
    cleanup_on_failure: bool,
) -> TestContext {
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let storage = UploadStorage::new(upload_dir.path()).expect("Failed to create storage");

    let sender: Arc<dyn MailSender> = mailer.clone();
    let app_state = Arc::new(
        AppState::new(sender, Intake::new(storage, max_file_size), SERVICE_MAILBOX)
            .with_cleanup_on_failure(cleanup_on_failure),
    );

    let router = create_router(app_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        mailer,
        upload_dir,
    }
}
