//! PDF text extraction utilities.
//!
//! Wraps the pdf-extract crate. pdf-extract panics on some malformed
//! documents instead of returning an error, so every call runs inside
//! [`std::panic::catch_unwind`] and a panic becomes [`PdfExtractError::Panicked`].

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("PDF extraction panicked (malformed document)")]
    Panicked,

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract text from a PDF file, one string per page.
///
/// # Examples
///
/// ```ignore
/// let pages = extract_pages(Path::new("paper.pdf"))?;
/// println!("Extracted {} pages", pages.len());
/// ```
pub fn extract_pages(path: &Path) -> Result<Vec<String>, PdfExtractError> {
    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let data = std::fs::read(path)?;
    extract_pages_from_mem(&data)
}

/// Extract text from PDF bytes, one string per page
pub fn extract_pages_from_mem(data: &[u8]) -> Result<Vec<String>, PdfExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(PdfExtractError::ExtractionFailed(e.to_string())),
        Err(_) => Err(PdfExtractError::Panicked),
    }
}
