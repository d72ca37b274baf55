//! Input validation for file paths and language codes.
//!
//! Language codes end up on the tesseract command line, so they are limited
//! to a conservative character set.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),
}

const MAX_LANGUAGE_LENGTH: usize = 32;

/// Validate a tesseract-style language code such as `eng`, `chi_sim` or `deu+eng`
///
/// Returns the trimmed code if valid.
pub fn validate_language(code: &str) -> Result<String, ValidationError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::InvalidLanguage("empty code".to_string()));
    }

    if code.len() > MAX_LANGUAGE_LENGTH {
        return Err(ValidationError::InvalidLanguage(format!(
            "longer than {} characters",
            MAX_LANGUAGE_LENGTH
        )));
    }

    // `-` is allowed inside codes (e.g. `script-latin`) but never leading, so a
    // code cannot be mistaken for a tesseract flag
    if code.starts_with('-') || code.starts_with('+') {
        return Err(ValidationError::InvalidLanguage(code.to_string()));
    }

    for ch in code.chars() {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '+' || ch == '-') {
            return Err(ValidationError::InvalidLanguage(format!(
                "contains disallowed character: {:?}",
                ch
            )));
        }
    }

    Ok(code.to_string())
}

/// Validate a caller-supplied PDF path before it touches the filesystem
pub fn validate_pdf_path(path: &str) -> Result<String, ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::InvalidPath("empty path".to_string()));
    }

    if path.contains('\0') {
        return Err(ValidationError::InvalidPath(
            "contains null byte".to_string(),
        ));
    }

    Ok(path.to_string())
}
