//! Retention of raw uploaded documents on local disk.
//!
//! Stored names are `<32 hex token>_<sanitized original name>`, where
//! sanitization keeps only `[A-Za-z0-9_.-]`. The mapping back to the upload is
//! implicit in the name; nothing else is persisted.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

static UNSAFE_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS_RE.replace_all(name, "").into_owned()
}

/// Collision-resistant name for a newly uploaded document.
pub fn generate_stored_name(original_filename: &str) -> String {
    format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_filename(original_filename)
    )
}

/// Content type served for a retained document, by extension.
pub fn content_type_for(stored_name: &str) -> &'static str {
    let lower = stored_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.dir.display()))?;
        info!("Upload directory ready at {}", self.dir.display());
        Ok(())
    }

    /// Writes the raw bytes under a freshly generated name and returns that name.
    pub async fn persist(&self, original_filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        let stored_name = generate_stored_name(original_filename);
        let path = self.dir.join(&stored_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::StorageFailure(format!("could not write {}: {e}", path.display()))
        })?;

        info!(stored_name = %stored_name, size = bytes.len(), "Stored uploaded document");
        Ok(stored_name)
    }

    /// Reads back a retained document by its stored name.
    pub async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AppError> {
        if !is_stored_name(stored_name) {
            warn!("Rejected upload lookup for '{stored_name}'");
            return Err(AppError::NotFound("File not found.".to_string()));
        }

        match tokio::fs::read(self.dir.join(stored_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found.".to_string()))
            }
            Err(e) => Err(AppError::StorageFailure(format!(
                "could not read {stored_name}: {e}"
            ))),
        }
    }
}

/// Only names already in sanitized form, and never a relative path component.
fn is_stored_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && sanitize_filename(name) == name
}
