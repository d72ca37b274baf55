//! Raw byte-pattern scan, the last resort when no PDF library can read the file.
//!
//! Text shown with `Tj` in an uncompressed content stream is stored as a
//! parenthesised literal string, so a regex over the Latin-1 decoded bytes
//! recovers some readable fragments even without parsing the document.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::ExtractionMethod;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyError, StrategyOutput};

/// Signature every PDF file starts with
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Message for input without the PDF signature
pub const INVALID_PDF_MESSAGE: &str = "File does not appear to be a valid PDF";

/// Fragments this short or shorter are ignored
const MIN_FRAGMENT_CHARS: usize = 3;

fn literal_string() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("valid regex"))
}

fn page_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/Type\s*/Page\b").expect("valid regex"))
}

/// Scans file bytes for parenthesised text runs
#[derive(Debug, Clone)]
pub struct ByteScanStrategy {
    max_fragments: usize,
}

impl ByteScanStrategy {
    pub fn new(max_fragments: usize) -> Self {
        Self { max_fragments }
    }

    /// Scan in-memory bytes
    pub fn scan(&self, content: &[u8]) -> Result<StrategyOutput, StrategyError> {
        if !content.starts_with(PDF_SIGNATURE) {
            return Err(StrategyError::InvalidPdf(INVALID_PDF_MESSAGE.to_string()));
        }

        // Latin-1 maps every byte to the code point of the same value
        let decoded: String = content.iter().map(|&b| char::from(b)).collect();

        let fragments: Vec<String> = literal_string()
            .captures_iter(&decoded)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|run| run.chars().count() > MIN_FRAGMENT_CHARS && run.chars().any(char::is_alphabetic))
            .map(|run| {
                run.chars()
                    .filter(|c| !c.is_control() || c.is_whitespace())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .filter(|fragment| !fragment.is_empty())
            .take(self.max_fragments)
            .collect();

        let page_count = page_object().find_iter(&decoded).count().max(1);
        tracing::debug!("Byte scan: {} fragments, ~{} pages", fragments.len(), page_count);

        if fragments.is_empty() {
            let text = format!(
                "PDF file detected (size: {} bytes). Text extraction requires an embedded text library.",
                content.len()
            );
            return Ok(StrategyOutput::new(text, ExtractionMethod::FileInfoOnly).with_pages(page_count));
        }

        Ok(StrategyOutput::new(fragments.join("\n"), self.method()).with_pages(page_count))
    }
}

impl Default for ByteScanStrategy {
    fn default() -> Self {
        Self::new(50)
    }
}

impl ExtractionStrategy for ByteScanStrategy {
    fn id(&self) -> &str {
        "byte_scan"
    }

    fn name(&self) -> &str {
        "Byte scan"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::ByteScan
    }

    fn capability(&self) -> StrategyCapabilities {
        StrategyCapabilities::BYTE_SCAN
    }

    fn extract(&self, path: &Path, _language: &str) -> Result<StrategyOutput, StrategyError> {
        let content = std::fs::read(path)?;
        self.scan(&content)
    }
}
