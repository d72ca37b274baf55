//! Extraction strategy plugins with a trait-based architecture.
//!
//! This module defines the [`ExtractionStrategy`] trait that every way of
//! getting text out of a PDF implements. Strategies are registered with the
//! [`StrategyRegistry`] and arranged into stages by [`crate::cascade`].
//!
//! # Feature Flags
//!
//! Strategies backed by optional libraries can be compiled out:
//!
//! - `embedded-text` - Direct embedded-text extraction with lopdf (default: enabled)
//! - `multilingual` - Structured extraction with pdf-extract (default: enabled)
//! - `ocr` - Rasterize, preprocess and recognise (default: enabled)
//!
//! The byte scan has no dependencies and is always compiled.
//!
//! # Runtime Capabilities
//!
//! Compiled features are combined with a runtime probe for the `pdftoppm` and
//! `tesseract` executables into [`StrategyCapabilities`]. A strategy whose
//! capability is missing is skipped by the cascade and reported as
//! unavailable.

mod byte_scan;
#[cfg(feature = "embedded-text")]
mod embedded;
#[cfg(feature = "multilingual")]
mod multilingual;
#[cfg(feature = "ocr")]
mod ocr;
mod registry;

pub mod mock;

pub use byte_scan::ByteScanStrategy;
#[cfg(feature = "embedded-text")]
pub use embedded::EmbeddedTextStrategy;
pub use mock::MockStrategy;
#[cfg(feature = "multilingual")]
pub use multilingual::MultilingualStrategy;
#[cfg(feature = "ocr")]
pub use ocr::OcrStrategy;
pub use registry::{StrategyCapabilities, StrategyRegistry};

use std::path::Path;

use crate::models::ExtractionMethod;

/// Text produced by one strategy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutput {
    /// Raw text, before post-processing
    pub text: String,

    /// Method tag reported when this output wins
    pub method: ExtractionMethod,

    /// Best-effort page count
    pub page_count: usize,

    /// Pages that failed and were skipped
    pub failed_pages: usize,
}

impl StrategyOutput {
    /// Create an output with no page information
    pub fn new(text: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            text: text.into(),
            method,
            page_count: 0,
            failed_pages: 0,
        }
    }

    /// Set the page count
    pub fn with_pages(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }

    /// Set the number of skipped pages
    pub fn with_failed_pages(mut self, failed_pages: usize) -> Self {
        self.failed_pages = failed_pages;
        self
    }
}

/// The ExtractionStrategy trait defines the interface for all extraction plugins.
///
/// # Implementing a New Strategy
///
/// 1. Create a struct that implements `ExtractionStrategy`
/// 2. Return a capability flag the registry can gate on
/// 3. Absorb per-page failures inside `extract`; return an error only when
///    the strategy as a whole produced nothing usable
/// 4. Register it in `StrategyRegistry::new()` and place it in a stage
pub trait ExtractionStrategy: Send + Sync + std::fmt::Debug {
    /// Unique identifier (e.g. "ocr", "embedded_text")
    fn id(&self) -> &str;

    /// Human-readable name used in logs and error notes
    fn name(&self) -> &str;

    /// Method tag of successful output
    fn method(&self) -> ExtractionMethod;

    /// Capability this strategy needs to run
    fn capability(&self) -> StrategyCapabilities;

    /// Whether the strategy can run right now
    fn is_available(&self) -> bool {
        true
    }

    /// Extract text from the file at `path`
    fn extract(&self, path: &Path, language: &str) -> Result<StrategyOutput, StrategyError>;
}

/// Errors that can occur inside a strategy
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Input is not a PDF
    #[error("{0}")]
    InvalidPdf(String),

    /// The PDF library rejected the document
    #[error("PDF error: {0}")]
    Pdf(String),

    /// An external tool failed to start or exited with an error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Image decoding or processing failed
    #[error("Image error: {0}")]
    Image(String),

    /// Every page failed
    #[error("No page produced text ({0} failed)")]
    NoPages(usize),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "embedded-text")]
impl From<lopdf::Error> for StrategyError {
    fn from(err: lopdf::Error) -> Self {
        StrategyError::Pdf(err.to_string())
    }
}

#[cfg(feature = "ocr")]
impl From<image::ImageError> for StrategyError {
    fn from(err: image::ImageError) -> Self {
        StrategyError::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_builder() {
        let output = StrategyOutput::new("text", ExtractionMethod::EnhancedOcr)
            .with_pages(3)
            .with_failed_pages(1);

        assert_eq!(output.page_count, 3);
        assert_eq!(output.failed_pages, 1);
        assert_eq!(output.method, ExtractionMethod::EnhancedOcr);
    }

    #[test]
    fn test_invalid_pdf_message_is_verbatim() {
        let err = StrategyError::InvalidPdf("File does not appear to be a valid PDF".into());
        assert_eq!(err.to_string(), "File does not appear to be a valid PDF");
    }
}
