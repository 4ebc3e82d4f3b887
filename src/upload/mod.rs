//! Upload intake and staging for formrelay.
//!
//! This module provides the file side of job applications:
//! - The fixed registry of document fields (one file each)
//! - Extension and per-file size checks at intake time
//! - Disk staging with collision-free names
//! - Best-effort release of staged files

mod document;
mod intake;
mod storage;

pub use document::{
    is_allowed_extension, DocumentField, StagedDocuments, UploadedDocument, ALLOWED_EXTENSIONS,
};
pub use intake::{Intake, IntakeError, ReceivedForm};
pub use storage::UploadStorage;

/// Default maximum size of one uploaded file (6 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 6 * 1024 * 1024;
