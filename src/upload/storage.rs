//! Upload staging storage for formrelay.
//!
//! Uploaded documents are written to a single flat directory shared by all
//! requests and removed once their message has been sent:
//! ```text
//! {base_path}/
//! ├── 1718000000000-482911034-passport_front.jpg
//! ├── 1718000000412-77120356-my_cv.pdf
//! └── ...
//! ```
//! Names combine a millisecond timestamp and a random number, so concurrent
//! requests do not collide and no lock is needed. Staged files are opened
//! with `create_new`, so an unlucky collision fails instead of overwriting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tokio::fs::{File, OpenOptions};

use crate::Result;

/// Upper bound (inclusive) of the random component of stored names.
const RANDOM_SUFFIX_MAX: u32 = 1_000_000_000;

/// Fallback when a client-supplied name has nothing usable left.
const FALLBACK_NAME: &str = "upload";

/// Longest name suffix kept in a stored name, in bytes. The timestamp and
/// random prefix add at most 25 more, staying under the usual 255-byte limit.
const MAX_SAFE_NAME_BYTES: usize = 200;

/// Longest trailing `.ext` preserved when a name is shortened.
const MAX_EXTENSION_BYTES: usize = 16;

/// Staging directory for uploaded documents.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Base directory for staged files.
    base_path: PathBuf,
}

impl UploadStorage {
    /// Create a new UploadStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Generate a unique stored name for a client-supplied filename.
    ///
    /// Format: `{unix_millis}-{random 0..=1e9}-{name}` where whitespace runs
    /// in the name become a single `_` and directory components are dropped.
    pub fn generate_stored_name(original_name: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let random = rand::rng().random_range(0..=RANDOM_SUFFIX_MAX);
        format!("{millis}-{random}-{}", Self::safe_name(original_name))
    }

    /// Allocate a fresh path in the staging directory for a new upload.
    pub fn stage_path(&self, original_name: &str) -> PathBuf {
        self.base_path
            .join(Self::generate_stored_name(original_name))
    }

    /// Create a new staged file for writing.
    ///
    /// Fails with `AlreadyExists` rather than truncating a file another
    /// request is still using.
    pub async fn create_file(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
    }

    /// Delete a staged file.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub async fn remove(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete several staged files, best-effort.
    ///
    /// Failures are logged and skipped. Returns the number of files removed.
    pub async fn release<I, P>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut removed = 0;
        for path in paths {
            let path = path.as_ref();
            match self.remove(path).await {
                Ok(true) => removed += 1,
                Ok(false) => {
                    tracing::debug!(path = %path.display(), "Staged upload already gone");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete upload");
                }
            }
        }
        removed
    }

    /// Reduce a client-supplied filename to a safe, readable suffix.
    fn safe_name(original_name: &str) -> String {
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();

        let mut name = String::with_capacity(base.len());
        let mut in_whitespace = false;
        for c in base.chars() {
            if c.is_whitespace() {
                if !in_whitespace {
                    name.push('_');
                }
                in_whitespace = true;
            } else if !c.is_control() {
                name.push(c);
                in_whitespace = false;
            }
        }

        if name.is_empty() || name == "." || name == ".." {
            FALLBACK_NAME.to_string()
        } else {
            Self::truncate_name(name)
        }
    }

    /// Shorten a name to `MAX_SAFE_NAME_BYTES`, keeping its extension.
    fn truncate_name(name: String) -> String {
        if name.len() <= MAX_SAFE_NAME_BYTES {
            return name;
        }

        let (stem, ext) = match name.rfind('.') {
            Some(i) if i > 0 && name.len() - i <= MAX_EXTENSION_BYTES => name.split_at(i),
            _ => (name.as_str(), ""),
        };

        let mut end = MAX_SAFE_NAME_BYTES - ext.len();
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}{}", &stem[..end], ext)
    }
}
