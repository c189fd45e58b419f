//! Tabular export of processed resumes.
//!
//! One CSV row per stored result, in store order:
//! Filename, Name, Email, College, Technical Skills.

use std::borrow::Borrow;

use thiserror::Error;

use crate::extraction::grouper::FieldLabel;
use crate::models::result::ExtractionResult;

pub const EXPORT_FILENAME: &str = "resume_analysis.csv";
pub const EXPORT_HEADERS: [&str; 5] = ["Filename", "Name", "Email", "College", "Technical Skills"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No resumes to export. Please process some resumes first.")]
    NoResults,

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps a result to its fixed five-column row. Missing fields become empty cells.
pub fn export_row(result: &ExtractionResult) -> [String; 5] {
    let groups = &result.groups;
    let first = |label| groups.first(label).unwrap_or_default().to_string();
    let skills = groups
        .get(FieldLabel::TechnicalSkills)
        .map(|skills| skills.join(", "))
        .unwrap_or_default();

    [
        result.original_filename.clone(),
        first(FieldLabel::Name),
        first(FieldLabel::Email),
        first(FieldLabel::CollegeName),
        skills,
    ]
}

/// Serializes results to CSV bytes with a header row.
pub fn export_table<R: Borrow<ExtractionResult>>(results: &[R]) -> Result<Vec<u8>, ExportError> {
    if results.is_empty() {
        return Err(ExportError::NoResults);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for result in results {
        writer.write_record(export_row(result.borrow()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
