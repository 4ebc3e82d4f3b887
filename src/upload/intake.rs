//! Multipart intake for application uploads.
//!
//! Reads a multipart body part by part. Text parts are collected as form
//! fields; file parts are checked against the document registry and
//! streamed straight into the staging directory. Any rejection removes
//! every file this request has staged so far.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::document::{is_allowed_extension, DocumentField, StagedDocuments, UploadedDocument};
use super::storage::UploadStorage;

/// Errors that abort intake of a multipart request.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// A file part used a name outside the document registry.
    #[error("unexpected file field: {0}")]
    UnexpectedField(String),

    /// A second file was sent for the same field.
    #[error("more than one file for field {0}")]
    DuplicateField(DocumentField),

    /// The file's extension is not accepted.
    #[error("unsupported file type for {field}: {filename}")]
    UnsupportedFileType {
        /// Field the file was sent under.
        field: DocumentField,
        /// Client-supplied filename.
        filename: String,
    },

    /// The file exceeded the per-file size limit.
    #[error("file for {field} exceeds {limit} bytes")]
    FileTooLarge {
        /// Field the file was sent under.
        field: DocumentField,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The body is not valid multipart data.
    #[error("malformed multipart body: {0}")]
    Malformed(String),

    /// Writing the staged file failed.
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for IntakeError {
    fn from(e: MultipartError) -> Self {
        IntakeError::Malformed(e.body_text())
    }
}

/// Result of a successful intake.
#[derive(Debug, Default)]
pub struct ReceivedForm {
    /// Text fields by name. A repeated field keeps its last value.
    pub text: HashMap<String, String>,
    /// Files staged on disk.
    pub documents: StagedDocuments,
}

impl ReceivedForm {
    /// Get a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }
}

/// Reads application uploads into the staging directory.
#[derive(Debug, Clone)]
pub struct Intake {
    storage: UploadStorage,
    max_file_size: u64,
}

impl Intake {
    /// Create an intake writing to `storage` with a per-file size limit.
    pub fn new(storage: UploadStorage, max_file_size: u64) -> Self {
        Self {
            storage,
            max_file_size,
        }
    }

    /// Staging storage used by this intake.
    pub fn storage(&self) -> &UploadStorage {
        &self.storage
    }

    /// Per-file size limit in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Consume a multipart body.
    ///
    /// On error nothing from this request is left in the staging directory.
    pub async fn receive(&self, multipart: &mut Multipart) -> Result<ReceivedForm, IntakeError> {
        let mut form = ReceivedForm::default();

        match self.read_parts(multipart, &mut form).await {
            Ok(()) => Ok(form),
            Err(e) => {
                let removed = self.storage.release(form.documents.paths()).await;
                tracing::debug!(removed, "Discarded staged uploads of rejected request");
                Err(e)
            }
        }
    }

    async fn read_parts(
        &self,
        multipart: &mut Multipart,
        form: &mut ReceivedForm,
    ) -> Result<(), IntakeError> {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let original_name = match field.file_name().map(str::to_string) {
                None => {
                    let value = field.text().await?;
                    form.text.insert(name, value);
                    continue;
                }
                // An empty file input: browsers send the part with no filename.
                Some(file_name) if file_name.is_empty() => continue,
                Some(file_name) => file_name,
            };

            let document_field = DocumentField::from_name(&name)
                .ok_or_else(|| IntakeError::UnexpectedField(name.clone()))?;

            if form.documents.contains(document_field) {
                return Err(IntakeError::DuplicateField(document_field));
            }

            if !is_allowed_extension(&original_name) {
                return Err(IntakeError::UnsupportedFileType {
                    field: document_field,
                    filename: original_name,
                });
            }

            let document = self.stage(field, document_field, original_name).await?;
            tracing::debug!(
                field = %document.field,
                size = document.size_bytes,
                path = %document.stored_path.display(),
                "Staged upload"
            );

            if let Err(document) = form.documents.insert(document) {
                self.storage.release([&document.stored_path]).await;
                return Err(IntakeError::DuplicateField(document_field));
            }
        }

        Ok(())
    }

    /// Stream one file part to a fresh staging path.
    async fn stage(
        &self,
        mut field: Field<'_>,
        document_field: DocumentField,
        original_name: String,
    ) -> Result<UploadedDocument, IntakeError> {
        let stored_path = self.storage.stage_path(&original_name);
        let mut file = self.storage.create_file(&stored_path).await?;

        let written = self
            .write_limited(&mut field, &mut file, document_field)
            .await;
        drop(file);

        match written {
            Ok(size_bytes) => Ok(UploadedDocument {
                field: document_field,
                original_name,
                stored_path,
                size_bytes,
            }),
            Err(e) => {
                self.discard_partial(&stored_path).await;
                Err(e)
            }
        }
    }

    async fn write_limited(
        &self,
        field: &mut Field<'_>,
        file: &mut File,
        document_field: DocumentField,
    ) -> Result<u64, IntakeError> {
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
            if size > self.max_file_size {
                return Err(IntakeError::FileTooLarge {
                    field: document_field,
                    limit: self.max_file_size,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(size)
    }

    async fn discard_partial(&self, path: &Path) {
        if let Err(e) = self.storage.remove(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete partial upload");
        }
    }
}
