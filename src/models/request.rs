//! Extraction request model.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tesseract language code used when the caller does not pass one
pub const DEFAULT_LANGUAGE: &str = "eng";

/// A request to extract text from one PDF file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Nominal path to the PDF (may be relocated by the path resolver)
    pub file_path: String,

    /// Locale code handed to the OCR engine (e.g. "eng", "deu+eng")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl ExtractionRequest {
    /// Create a new request with the default language
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            language: default_language(),
        }
    }

    /// Set the language code
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The file name component of the nominal path, or "unknown"
    pub fn filename(&self) -> String {
        file_name_or_unknown(&self.file_path)
    }
}

/// Basename of `path`, falling back to "unknown" for empty or root-only paths
pub(crate) fn file_name_or_unknown(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = ExtractionRequest::new("/sdcard/Download/report.pdf");
        assert_eq!(request.language, "eng");
        assert_eq!(request.filename(), "report.pdf");
    }

    #[test]
    fn test_request_language() {
        let request = ExtractionRequest::new("a.pdf").language("deu");
        assert_eq!(request.language, "deu");
    }

    #[test]
    fn test_filename_unknown() {
        assert_eq!(ExtractionRequest::new("").filename(), "unknown");
        assert_eq!(ExtractionRequest::new("/").filename(), "unknown");
    }

    #[test]
    fn test_deserialize_without_language() {
        let request: ExtractionRequest =
            serde_json::from_str(r#"{"file_path": "doc.pdf"}"#).unwrap();
        assert_eq!(request.language, DEFAULT_LANGUAGE);
    }
}
