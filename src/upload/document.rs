//! Document fields accepted by the application form.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::mail::MailAttachment;

/// Extensions accepted for uploaded documents (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Check whether a client-supplied filename carries an accepted extension.
pub fn is_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// A named file slot on the application form.
///
/// Each field accepts at most one file. The declaration order is the order
/// attachments appear in the outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    PassportFront,
    PassportBack,
    Photo,
    Education,
    Experience,
    Aadhaar,
    Pan,
    BirthCertificate,
}

impl DocumentField {
    /// All fields, in registration order.
    pub const ALL: [DocumentField; 8] = [
        DocumentField::PassportFront,
        DocumentField::PassportBack,
        DocumentField::Photo,
        DocumentField::Education,
        DocumentField::Experience,
        DocumentField::Aadhaar,
        DocumentField::Pan,
        DocumentField::BirthCertificate,
    ];

    /// Multipart field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentField::PassportFront => "passport_front",
            DocumentField::PassportBack => "passport_back",
            DocumentField::Photo => "photo",
            DocumentField::Education => "education",
            DocumentField::Experience => "experience",
            DocumentField::Aadhaar => "aadhaar",
            DocumentField::Pan => "pan",
            DocumentField::BirthCertificate => "birth_certificate",
        }
    }

    /// Look up a field by its multipart name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file accepted by intake and written to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Form field the file was uploaded under.
    pub field: DocumentField,
    /// Filename as sent by the client.
    pub original_name: String,
    /// Location in the staging directory.
    pub stored_path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl UploadedDocument {
    /// Attachment descriptor for the outgoing message.
    pub fn to_attachment(&self) -> MailAttachment {
        MailAttachment::new(self.original_name.clone(), self.stored_path.clone())
    }
}

/// Staged documents of one request, one optional slot per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedDocuments {
    slots: [Option<UploadedDocument>; 8],
}

impl StagedDocuments {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the document staged for a field.
    pub fn get(&self, field: DocumentField) -> Option<&UploadedDocument> {
        self.slots[field.index()].as_ref()
    }

    /// Whether a field already holds a document.
    pub fn contains(&self, field: DocumentField) -> bool {
        self.get(field).is_some()
    }

    /// Store a document in its field's slot.
    ///
    /// Returns the rejected document if the slot is already taken.
    pub fn insert(&mut self, document: UploadedDocument) -> Result<(), UploadedDocument> {
        let slot = &mut self.slots[document.field.index()];
        if slot.is_some() {
            return Err(document);
        }
        *slot = Some(document);
        Ok(())
    }

    /// Iterate staged documents in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.slots.iter().flatten()
    }

    /// Number of staged documents.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no documents are staged.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Attachments in registration order, skipping empty fields.
    pub fn attachments(&self) -> Vec<MailAttachment> {
        self.iter().map(UploadedDocument::to_attachment).collect()
    }

    /// Paths of all staged files.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.iter().map(|d| d.stored_path.clone()).collect()
    }
}
