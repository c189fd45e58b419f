//! Text extractor: turns raw document bytes into one normalized text string.
//!
//! PDF pages are concatenated in document order with a line break after every
//! page. No OCR and no layout reconstruction: text follows the page/stream order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Error parsing file: {0}")]
    ParseFailure(String),
}

/// Declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub fn as_tag(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::PlainText => "plain-text",
        }
    }

    /// Infers the format from a filename's extension (`.pdf`, `.txt`).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentFormat::Pdf)
        } else if lower.ends_with(".txt") {
            Ok(DocumentFormat::PlainText)
        } else {
            Err(ExtractError::UnsupportedFormat(filename.to_string()))
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = ExtractError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "plain-text" => Ok(DocumentFormat::PlainText),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Raw bytes plus their declared format. Lives for one extraction call.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub bytes: &'a [u8],
    pub format: DocumentFormat,
}

/// Produces normalized text for a document.
pub fn extract_text(document: &Document<'_>) -> Result<String, ExtractError> {
    match document.format {
        DocumentFormat::Pdf => extract_pdf_text(document.bytes),
        DocumentFormat::PlainText => std::str::from_utf8(document.bytes)
            .map(str::to_string)
            .map_err(|e| ExtractError::ParseFailure(format!("invalid UTF-8: {e}"))),
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed streams instead of returning Err.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::ParseFailure("PDF parser aborted".to_string()))?
        .map_err(|e| ExtractError::ParseFailure(format!("PDF extraction error: {e}")))?;

    Ok(join_pages(&pages))
}

/// A page with no extractable text contributes an empty segment.
fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}
