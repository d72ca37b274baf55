//! End-to-end extraction: resolve the file, run the cascade, build the result.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::cascade::{AttemptOutcome, Cascade, CascadeOutcome};
use crate::config::{self, Config};
use crate::models::{file_name_or_unknown, ExtractionMetadata, ExtractionRequest, ExtractionResult};
use crate::strategies::{StrategyCapabilities, StrategyRegistry};
use crate::utils::resolver::{PathResolver, Resolution};
use crate::utils::text::{post_process_with, PostProcessOptions};
use crate::utils::validate::{validate_language, validate_pdf_path, ValidationError};

/// Which deployment the extractor behaves like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Variant {
    /// Quality-first cascade, nominal path only, post-processed text
    #[default]
    Standalone,
    /// Library-first cascade with byte-scan fallback and path resolution
    Embedded,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standalone => write!(f, "standalone"),
            Variant::Embedded => write!(f, "embedded"),
        }
    }
}

/// Errors that end an extraction with `success: false`
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{}", not_found_message(path, attempted))]
    FileNotFound { path: String, attempted: Vec<String> },

    #[error("No extraction strategy is available for {0} mode")]
    LibraryUnavailable(Variant),

    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    TotalFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn not_found_message(path: &str, attempted: &[String]) -> String {
    if attempted.is_empty() {
        format!("PDF file not found: {}", path)
    } else {
        format!("PDF file not found. Tried paths: {}", attempted.join(", "))
    }
}

impl From<ValidationError> for ExtractError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidLanguage(msg) => ExtractError::InvalidLanguage(msg),
            ValidationError::InvalidPath(msg) => ExtractError::InvalidPath(msg),
        }
    }
}

/// Runs extractions for one variant with a fixed configuration
#[derive(Debug, Clone)]
pub struct Extractor {
    config: Config,
    variant: Variant,
    cascade: Cascade,
}

impl Extractor {
    /// Create an extractor, detecting capabilities for the variant.
    ///
    /// Only the standalone variant uses OCR, so only it probes for the
    /// external tools.
    pub fn new(config: Config, variant: Variant) -> Self {
        let capabilities = match variant {
            Variant::Standalone => StrategyCapabilities::detect(&config),
            Variant::Embedded => StrategyCapabilities::compiled(),
        };
        let registry = StrategyRegistry::new(&config, capabilities);
        Self::with_registry(config, variant, &registry)
    }

    /// Create an extractor over an existing registry
    pub fn with_registry(config: Config, variant: Variant, registry: &StrategyRegistry) -> Self {
        let cascade = match variant {
            Variant::Standalone => Cascade::standalone(registry, &config.cascade),
            Variant::Embedded => Cascade::embedded(registry),
        };
        Self::with_cascade(config, variant, cascade)
    }

    /// Create an extractor with a custom cascade
    pub fn with_cascade(config: Config, variant: Variant, cascade: Cascade) -> Self {
        Self {
            config,
            variant,
            cascade,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Fail if no stage of the cascade can run here
    pub fn ensure_usable(&self) -> Result<(), ExtractError> {
        if self.cascade.has_usable_stage() {
            Ok(())
        } else {
            Err(ExtractError::LibraryUnavailable(self.variant))
        }
    }

    /// Extract text; every error becomes a failure result
    pub fn extract(&self, request: &ExtractionRequest) -> ExtractionResult {
        tracing::info!("Extracting text from: {}", request.file_path);

        match self.try_extract(request) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Error extracting text from PDF: {}", e);
                self.failure(request, e)
            }
        }
    }

    fn try_extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult, ExtractError> {
        validate_pdf_path(&request.file_path)?;
        // Only the standalone cascade hands the language to tesseract
        let language = match self.variant {
            Variant::Standalone => validate_language(&request.language)?,
            Variant::Embedded => request.language.clone(),
        };

        let (path, relocated) = self.locate(&request.file_path)?;
        let file_size = std::fs::metadata(&path)?.len();
        let filename = file_name_or_unknown(&path.to_string_lossy());

        let outcome = self.cascade.run(&path, &language);

        let mut metadata = ExtractionMetadata::new(filename, file_size, language);
        if relocated {
            metadata = metadata.actual_path(path.to_string_lossy());
        }

        self.build(outcome, metadata)
    }

    /// Find the file to read, and whether it is somewhere other than the nominal path
    fn locate(&self, nominal: &str) -> Result<(PathBuf, bool), ExtractError> {
        match self.variant {
            Variant::Standalone => {
                if Path::new(nominal).exists() {
                    Ok((PathBuf::from(nominal), false))
                } else {
                    Err(ExtractError::FileNotFound {
                        path: nominal.to_string(),
                        attempted: Vec::new(),
                    })
                }
            }
            Variant::Embedded => match PathResolver::new(&self.config.resolver).resolve(nominal) {
                Resolution::Found { path, .. } => {
                    let relocated = path != Path::new(nominal);
                    Ok((path, relocated))
                }
                Resolution::NotFound { attempted } => Err(ExtractError::FileNotFound {
                    path: nominal.to_string(),
                    attempted,
                }),
            },
        }
    }

    fn build(&self, mut outcome: CascadeOutcome, metadata: ExtractionMetadata) -> Result<ExtractionResult, ExtractError> {
        let notes = outcome.error_notes();

        let Some(best) = outcome.best.take() else {
            if let Some(last) = outcome.failures().last() {
                let message = match self.variant {
                    Variant::Standalone => format!("All extraction strategies failed: {}", notes),
                    Variant::Embedded => match &last.outcome {
                        AttemptOutcome::Failed(message) => message.clone(),
                        _ => notes,
                    },
                };
                return Err(ExtractError::TotalFailure(message));
            }

            // Every stage was gated out or unavailable
            return Err(ExtractError::LibraryUnavailable(self.variant));
        };

        let text = match self.variant {
            Variant::Standalone => post_process_with(
                &best.text,
                PostProcessOptions {
                    fix_digraphs: self.config.postprocess.fix_digraphs,
                },
            ),
            Variant::Embedded => best.text.trim().to_string(),
        };

        tracing::info!(
            "Successfully extracted {} characters from {} using {}",
            text.chars().count(),
            metadata.filename,
            best.method
        );

        let metadata = metadata.method(best.method).page_count(best.page_count);
        Ok(ExtractionResult::success(text, notes, metadata))
    }

    /// Failure result with degraded metadata
    fn failure(&self, request: &ExtractionRequest, error: ExtractError) -> ExtractionResult {
        let mut metadata = ExtractionMetadata::failed(file_name_or_unknown(&request.file_path), &request.language);

        if let ExtractError::FileNotFound { attempted, .. } = &error {
            if !attempted.is_empty() {
                metadata = metadata.attempted_paths(attempted.clone());
            }
        }

        ExtractionResult::failure(error.to_string(), metadata)
    }
}

/// Embedded entry point: extract `path` and return the result as compact JSON.
///
/// Uses the default configuration plus environment overrides. Never panics;
/// a panic inside a PDF library is reported as a failure result.
pub fn extract_pdf_text(path: &str, language: &str) -> String {
    let request = ExtractionRequest::new(path).language(language);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        Extractor::new(config::get_config(), Variant::Embedded).extract(&request)
    }));

    match result {
        Ok(result) => result.to_json(),
        Err(_) => ExtractionResult::failure(
            "Unexpected panic during extraction",
            ExtractionMetadata::failed(file_name_or_unknown(path), language),
        )
        .to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{Stage, StageGate};
    use crate::models::ExtractionMethod;
    use crate::strategies::mock::make_pdf;
    use crate::strategies::MockStrategy;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, make_pdf(pages)).unwrap();
        path
    }

    fn mocked(variant: Variant, stages: Vec<Stage>) -> Extractor {
        Extractor::with_cascade(Config::default(), variant, Cascade::new(stages, StrategyCapabilities::all()))
    }

    #[test]
    fn test_standalone_missing_file() {
        let extractor = mocked(Variant::Standalone, vec![]);
        let result = extractor.extract(&ExtractionRequest::new("/no/such/file.pdf"));

        assert!(!result.is_success());
        assert_eq!(result.error(), "PDF file not found: /no/such/file.pdf");
        assert_eq!(result.metadata().filename, "file.pdf");
        assert_eq!(result.metadata().extraction_method, ExtractionMethod::Failed);
        assert!(result.metadata().attempted_paths.is_none());
    }

    #[test]
    fn test_invalid_language() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "a.pdf", &["Hello"]);
        let extractor = mocked(Variant::Standalone, vec![]);

        let request = ExtractionRequest::new(path.to_string_lossy()).language("eng; rm");
        let result = extractor.extract(&request);

        assert!(!result.is_success());
        assert!(result.error().starts_with("Invalid language code"));
    }

    #[test]
    fn test_embedded_keeps_any_language_as_metadata() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "a.pdf", &["Hello"]);
        let embedded = Arc::new(
            MockStrategy::new("embedded_text", ExtractionMethod::EmbeddedText, StrategyCapabilities::EMBEDDED_TEXT)
                .with_text("Hello"),
        );
        let extractor = mocked(Variant::Embedded, vec![Stage::new(embedded, StageGate::Always)]);

        let request = ExtractionRequest::new(path.to_string_lossy()).language("Deutsch (de)");
        let result = extractor.extract(&request);

        assert!(result.is_success());
        assert_eq!(result.metadata().language, "Deutsch (de)");
    }

    #[test]
    fn test_empty_path_uses_unknown_filename() {
        let extractor = mocked(Variant::Embedded, vec![]);
        let result = extractor.extract(&ExtractionRequest::new(""));

        assert!(!result.is_success());
        assert_eq!(result.metadata().filename, "unknown");
        assert_eq!(result.metadata().file_size, 0);
    }

    #[test]
    fn test_success_reports_earlier_failures() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "a.pdf", &["Hello"]);

        let ocr = Arc::new(
            MockStrategy::new("ocr", ExtractionMethod::EnhancedOcr, StrategyCapabilities::OCR).failing("boom"),
        );
        let embedded = Arc::new(
            MockStrategy::new("embedded_text", ExtractionMethod::EmbeddedText, StrategyCapabilities::EMBEDDED_TEXT)
                .with_text("Hello   World"),
        );
        let extractor = mocked(
            Variant::Standalone,
            vec![
                Stage::new(ocr, StageGate::Always),
                Stage::new(embedded, StageGate::BelowChars(50)),
            ],
        );

        let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

        assert!(result.is_success());
        assert_eq!(result.text(), "Hello World");
        assert_eq!(result.error(), "ocr error: PDF error: boom");
        assert_eq!(result.metadata().extraction_method, ExtractionMethod::EmbeddedText);
        assert_eq!(result.metadata().text_length, 11);
        assert_eq!(result.metadata().page_count, 1);
        assert!(result.metadata().file_size > 0);
    }

    #[test]
    fn test_standalone_total_failure() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "a.pdf", &["Hello"]);
        let failing = Arc::new(
            MockStrategy::new("ocr", ExtractionMethod::EnhancedOcr, StrategyCapabilities::OCR).failing("no tools"),
        );
        let extractor = mocked(Variant::Standalone, vec![Stage::new(failing, StageGate::Always)]);

        let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

        assert!(!result.is_success());
        assert_eq!(
            result.error(),
            "All extraction strategies failed: ocr error: PDF error: no tools"
        );
    }

    #[test]
    fn test_no_usable_stage() {
        let unavailable = Arc::new(
            MockStrategy::new("ocr", ExtractionMethod::EnhancedOcr, StrategyCapabilities::OCR).unavailable(),
        );
        let extractor = mocked(Variant::Standalone, vec![Stage::new(unavailable, StageGate::Always)]);

        assert!(matches!(
            extractor.ensure_usable(),
            Err(ExtractError::LibraryUnavailable(Variant::Standalone))
        ));
    }

    #[test]
    fn test_empty_output_reports_reading_strategy() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "a.pdf", &["Hello"]);
        let silent = Arc::new(MockStrategy::new(
            "embedded_text",
            ExtractionMethod::EmbeddedText,
            StrategyCapabilities::EMBEDDED_TEXT,
        ));
        let extractor = mocked(Variant::Standalone, vec![Stage::new(silent, StageGate::Always)]);

        let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

        assert!(result.is_success());
        assert_eq!(result.text(), "");
        assert_eq!(result.error(), "");
        assert_eq!(result.metadata().extraction_method, ExtractionMethod::EmbeddedText);
        assert_eq!(result.metadata().text_length, 0);
    }

    #[test]
    fn test_embedded_relocated_file_reports_actual_path() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), "moved-7d1e.pdf", &["Hello World"]);

        let mut config = Config::default();
        config.resolver.fallback_dirs = vec![dir.path().to_path_buf()];
        config.resolver.search_roots = Vec::new();
        let registry = StrategyRegistry::new(&config, StrategyCapabilities::compiled());
        let extractor = Extractor::with_registry(config, Variant::Embedded, &registry);

        let result = extractor.extract(&ExtractionRequest::new("/elsewhere/moved-7d1e.pdf"));

        assert!(result.is_success());
        assert_eq!(
            result.metadata().actual_path.as_deref(),
            Some(path.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_not_found_message_variants() {
        assert_eq!(not_found_message("/a.pdf", &[]), "PDF file not found: /a.pdf");
        assert_eq!(
            not_found_message("/a.pdf", &["/a.pdf".to_string(), "a.pdf".to_string()]),
            "PDF file not found. Tried paths: /a.pdf, a.pdf"
        );
    }
}
