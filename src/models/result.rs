//! Extraction result and metadata models.
//!
//! An [`ExtractionResult`] is the JSON document handed back to callers. It is
//! only produced through the constructors below and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Tag identifying which strategy produced the final text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// No strategy produced text
    None,
    /// Direct embedded-text extraction (lopdf)
    EmbeddedText,
    /// Rasterize, preprocess and recognise with tesseract
    EnhancedOcr,
    /// Structured multilingual extraction (pdf-extract)
    Multilingual,
    /// Raw byte-pattern scan of the file
    ByteScan,
    /// Valid PDF signature but no readable fragments
    FileInfoOnly,
    /// Extraction failed altogether
    Failed,
}

impl ExtractionMethod {
    /// Returns the wire tag of this method
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::None => "none",
            ExtractionMethod::EmbeddedText => "embedded_text",
            ExtractionMethod::EnhancedOcr => "enhanced_ocr",
            ExtractionMethod::Multilingual => "multilingual",
            ExtractionMethod::ByteScan => "byte_scan",
            ExtractionMethod::FileInfoOnly => "file_info_only",
            ExtractionMethod::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata describing the file and how its text was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// File name of the (resolved) PDF, or "unknown"
    pub filename: String,

    /// Size of the file in bytes (0 when the file could not be located)
    pub file_size: u64,

    /// Language code the extraction ran with
    pub language: String,

    /// Strategy that produced the text
    pub extraction_method: ExtractionMethod,

    /// Length of the final text in characters
    #[serde(default)]
    pub text_length: usize,

    /// Best-effort page count (0 when unknown)
    #[serde(default)]
    pub page_count: usize,

    /// Every location probed when the file could not be found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempted_paths: Option<Vec<String>>,

    /// Where the file was actually found when it was not at the nominal path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_path: Option<String>,
}

impl ExtractionMetadata {
    /// Create metadata for a located file; counts start at zero
    pub fn new(filename: impl Into<String>, file_size: u64, language: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_size,
            language: language.into(),
            extraction_method: ExtractionMethod::None,
            text_length: 0,
            page_count: 0,
            attempted_paths: None,
            actual_path: None,
        }
    }

    /// Degraded metadata for a failed extraction
    pub fn failed(filename: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(filename, 0, language).method(ExtractionMethod::Failed)
    }

    /// Set the extraction method
    pub fn method(mut self, method: ExtractionMethod) -> Self {
        self.extraction_method = method;
        self
    }

    /// Set the text length from the final text
    pub fn text(mut self, text: &str) -> Self {
        self.text_length = text.chars().count();
        self
    }

    /// Set the page count
    pub fn page_count(mut self, pages: usize) -> Self {
        self.page_count = pages;
        self
    }

    /// Record the locations probed during path resolution
    pub fn attempted_paths(mut self, paths: Vec<String>) -> Self {
        self.attempted_paths = Some(paths);
        self
    }

    /// Record the relocated path of the file
    pub fn actual_path(mut self, path: impl Into<String>) -> Self {
        self.actual_path = Some(path.into());
        self
    }
}

/// Final result of one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    success: bool,
    text: String,
    #[serde(default)]
    error: String,
    metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Create a successful result
    ///
    /// `notes` carries recoverable failures of earlier strategies and may be empty.
    pub fn success(text: impl Into<String>, notes: impl Into<String>, metadata: ExtractionMetadata) -> Self {
        let text = text.into();
        let metadata = metadata.text(&text);
        Self {
            success: true,
            text,
            error: notes.into(),
            metadata,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>, metadata: ExtractionMetadata) -> Self {
        Self {
            success: false,
            text: String::new(),
            error: error.into(),
            metadata: metadata.text(""),
        }
    }

    /// Whether text extraction succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The extracted text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Error message, empty when nothing went wrong
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Metadata about the file and method
    pub fn metadata(&self) -> &ExtractionMetadata {
        &self.metadata
    }

    /// Compact JSON, non-ASCII characters kept as-is
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| Self::serialization_fallback(&e))
    }

    /// Pretty-printed JSON, non-ASCII characters kept as-is
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| Self::serialization_fallback(&e))
    }

    fn serialization_fallback(err: &serde_json::Error) -> String {
        serde_json::json!({
            "success": false,
            "text": "",
            "error": format!("Failed to serialize result: {}", err),
            "metadata": {},
        })
        .to_string()
    }
}
