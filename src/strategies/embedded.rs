//! Direct embedded-text extraction with lopdf.

use std::fmt;
use std::path::Path;

use lopdf::Document;

use crate::models::ExtractionMethod;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyError, StrategyOutput};
use crate::utils::text::join_pages;

/// Reads the text layer of each page; pages that fail are skipped
#[derive(Debug, Default, Clone)]
pub struct EmbeddedTextStrategy;

impl EmbeddedTextStrategy {
    pub fn new() -> Self {
        Self
    }
}

/// Text of every page `read` handles, and how many pages it failed on
fn read_pages<E: fmt::Display>(
    page_numbers: impl IntoIterator<Item = u32>,
    mut read: impl FnMut(u32) -> Result<String, E>,
) -> (Vec<String>, usize) {
    let mut texts = Vec::new();
    let mut failed = 0;

    for page_number in page_numbers {
        match read(page_number) {
            Ok(text) => texts.push(text),
            Err(e) => {
                tracing::warn!("Failed to extract text from page {}: {}", page_number, e);
                failed += 1;
            }
        }
    }

    (texts, failed)
}

impl ExtractionStrategy for EmbeddedTextStrategy {
    fn id(&self) -> &str {
        "embedded_text"
    }

    fn name(&self) -> &str {
        "Embedded text"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::EmbeddedText
    }

    fn capability(&self) -> StrategyCapabilities {
        StrategyCapabilities::EMBEDDED_TEXT
    }

    fn extract(&self, path: &Path, _language: &str) -> Result<StrategyOutput, StrategyError> {
        let document = Document::load(path)?;
        let pages = document.get_pages();
        let page_count = pages.len();

        let (texts, failed) = read_pages(pages.keys().copied(), |page| document.extract_text(&[page]));

        if page_count > 0 && failed == page_count {
            return Err(StrategyError::NoPages(failed));
        }

        tracing::debug!(
            "Embedded text: {} pages, {} skipped, {}",
            page_count,
            failed,
            path.display()
        );

        Ok(StrategyOutput::new(join_pages(texts), self.method())
            .with_pages(page_count)
            .with_failed_pages(failed))
    }
}
