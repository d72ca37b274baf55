//! Structured multilingual extraction with pdf-extract.

use std::path::Path;

use crate::models::ExtractionMethod;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyError, StrategyOutput};
use crate::utils::pdf::{self, PdfExtractError};
use crate::utils::text::join_pages;

/// Decodes page content through font encodings and ToUnicode maps, which
/// handles non-Latin scripts better than the raw text layer
#[derive(Debug, Default, Clone)]
pub struct MultilingualStrategy;

impl MultilingualStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for MultilingualStrategy {
    fn id(&self) -> &str {
        "multilingual"
    }

    fn name(&self) -> &str {
        "Multilingual"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Multilingual
    }

    fn capability(&self) -> StrategyCapabilities {
        StrategyCapabilities::MULTILINGUAL
    }

    fn extract(&self, path: &Path, _language: &str) -> Result<StrategyOutput, StrategyError> {
        let pages = pdf::extract_pages(path).map_err(|e| match e {
            PdfExtractError::Io(io) => StrategyError::Io(io),
            other => StrategyError::Pdf(other.to_string()),
        })?;

        let page_count = pages.len();
        Ok(StrategyOutput::new(join_pages(pages), self.method()).with_pages(page_count))
    }
}
