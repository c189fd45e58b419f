//! Axum route handlers for the Resume API.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{export_table, EXPORT_FILENAME};
use crate::extraction::grouper::FieldLabel;
use crate::extraction::pipeline::{submit, Submission};
use crate::models::result::ExtractionResult;
use crate::state::AppState;
use crate::uploads::content_type_for;

/// Multipart field carrying the document.
const FILE_FIELD: &str = "resume";
/// Optional multipart field carrying an explicit format tag.
const FORMAT_FIELD: &str = "format";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring matched against each result's skills.
    pub skill: Option<String>,
}

/// POST /api/v1/resumes
///
/// Extracts fields from the uploaded document, stores the result and returns
/// every stored result, newest first.
pub async fn handle_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Arc<ExtractionResult>>>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut format_tag: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Could not read upload", e))?;
                file = Some((filename, bytes));
            }
            Some(FORMAT_FIELD) => {
                let tag = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Could not read format", e))?;
                format_tag = Some(tag);
            }
            _ => {}
        }
    }

    let (original_filename, bytes) =
        file.ok_or_else(|| AppError::EmptySubmission("No file part".to_string()))?;

    submit(
        state.store.as_ref(),
        &state.uploads,
        Arc::clone(&state.matchers),
        Submission {
            original_filename,
            format_tag,
            bytes,
        },
    )
    .await?;

    Ok(Json(state.store.list_all()))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Json<Vec<Arc<ExtractionResult>>> {
    let results = state.store.list_all();
    match params.skill.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => Json(filter_by_skill(results, query)),
        None => Json(results),
    }
}

/// GET /api/v1/resumes/export
///
/// Downloads every stored result as a CSV table.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let table = export_table(&state.store.list_all())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        table,
    ))
}

/// GET /api/v1/uploads/:filename
///
/// Serves a retained document inline so it can be viewed in the browser.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.uploads.read(&filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

/// Oversized bodies surface as 413; anything else is a malformed request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// Keeps results with at least one skill containing `query`, order preserved.
fn filter_by_skill(results: Vec<Arc<ExtractionResult>>, query: &str) -> Vec<Arc<ExtractionResult>> {
    let query = query.to_lowercase();
    results
        .into_iter()
        .filter(|result| {
            result
                .groups
                .get(FieldLabel::TechnicalSkills)
                .unwrap_or_default()
                .iter()
                .any(|skill| skill.to_lowercase().contains(&query))
        })
        .collect()
}
