//! Submission pipeline: raw bytes → normalized text → matchers → grouped
//! entities → result store.
//!
//! All-or-nothing: a result is appended only after every matcher has run over
//! successfully extracted text. Any extractor or storage failure appends nothing.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::grouper::EntityGroup;
use crate::extraction::matchers::MatcherSet;
use crate::extraction::text::{extract_text, Document, DocumentFormat, ExtractError};
use crate::models::result::ExtractionResult;
use crate::store::ResultStore;
use crate::uploads::UploadStorage;

/// One uploaded document as received from the client.
#[derive(Debug, Clone)]
pub struct Submission {
    pub original_filename: String,
    /// Explicit format tag; inferred from the filename when absent.
    pub format_tag: Option<String>,
    pub bytes: Bytes,
}

/// An explicit tag wins over the filename extension.
pub fn resolve_format(
    original_filename: &str,
    format_tag: Option<&str>,
) -> Result<DocumentFormat, ExtractError> {
    match format_tag.map(str::trim).filter(|tag| !tag.is_empty()) {
        Some(tag) => tag.parse(),
        None => DocumentFormat::from_filename(original_filename),
    }
}

/// Runs the extractor and every registered matcher over one document.
pub fn extract_entities(
    document: &Document<'_>,
    matchers: &MatcherSet,
) -> Result<EntityGroup, ExtractError> {
    let text = extract_text(document)?;
    Ok(matchers.run(&text))
}

pub async fn submit(
    store: &dyn ResultStore,
    uploads: &UploadStorage,
    matchers: Arc<MatcherSet>,
    submission: Submission,
) -> Result<Arc<ExtractionResult>, AppError> {
    let Submission {
        original_filename,
        format_tag,
        bytes,
    } = submission;

    if original_filename.trim().is_empty() {
        return Err(AppError::EmptySubmission("No selected file".to_string()));
    }
    if bytes.is_empty() {
        return Err(AppError::EmptySubmission(format!(
            "Uploaded file '{original_filename}' is empty"
        )));
    }

    let format = resolve_format(&original_filename, format_tag.as_deref())?;
    let stored_filename = uploads.persist(&original_filename, &bytes).await?;

    // PDF parsing is CPU-bound.
    let groups = tokio::task::spawn_blocking(move || {
        extract_entities(&Document { bytes: &bytes, format }, &matchers)
    })
    .await
    .map_err(|e| ExtractError::ParseFailure(format!("extraction task failed: {e}")))??;

    debug!(
        "Grouped entities for {original_filename}: {}",
        serde_json::to_string(&groups).unwrap_or_default()
    );

    let result = store.append(ExtractionResult {
        original_filename,
        stored_filename,
        groups,
        processed_at: Utc::now(),
    });

    info!(
        stored_filename = %result.stored_filename,
        %format,
        fields = result.groups.labels().count(),
        "Resume processed"
    );

    Ok(result)
}
