//! Integration tests for PDF Text Extractor
//!
//! These tests run whole extractions against PDFs generated on the fly and
//! check the JSON contract of the results.

use pdf_text_extractor::cascade::{Cascade, Stage, StageGate};
use pdf_text_extractor::config::Config;
use pdf_text_extractor::strategies::mock::{make_drawing_pdf, make_pdf};
use pdf_text_extractor::strategies::{ByteScanStrategy, ExtractionStrategy, MockStrategy, StrategyError};
use pdf_text_extractor::utils::{is_garbled, post_process};
use pdf_text_extractor::{
    extract_pdf_text, ExtractionMethod, ExtractionRequest, Extractor, StrategyCapabilities, StrategyRegistry,
    Variant,
};
use proptest::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

/// Config whose resolver never leaves the given directory
fn isolated_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.resolver.search_roots = vec![dir.to_path_buf()];
    config.resolver.max_search_depth = 2;
    config
}

/// Embedded-mode extractor without external tool probing
fn embedded_extractor(config: Config) -> Extractor {
    let registry = StrategyRegistry::new(&config, StrategyCapabilities::compiled());
    Extractor::with_registry(config, Variant::Embedded, &registry)
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn as_json(result: &pdf_text_extractor::ExtractionResult) -> serde_json::Value {
    serde_json::from_str(&result.to_json()).unwrap()
}

#[test]
#[cfg(feature = "embedded-text")]
fn test_hello_world_embedded_text() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "hello.pdf", &make_pdf(&["Hello World"]));

    let extractor = embedded_extractor(isolated_config(dir.path()));
    let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));
    let json = as_json(&result);

    assert_eq!(json["success"], true);
    assert!(json["text"].as_str().unwrap().contains("Hello World"));
    assert_eq!(json["metadata"]["extraction_method"], "embedded_text");
    assert_eq!(json["metadata"]["filename"], "hello.pdf");
    assert_eq!(json["metadata"]["page_count"], 1);
    assert_eq!(json["error"], "");
    assert!(json["metadata"].get("attempted_paths").is_none());
}

#[test]
#[cfg(feature = "embedded-text")]
fn test_hello_world_standalone_without_ocr() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "hello.pdf", &make_pdf(&["Hello World"]));

    // No OCR capability: the text has to come from the library stages
    let config = Config::default();
    let capabilities = StrategyCapabilities::compiled() - StrategyCapabilities::OCR;
    let registry = StrategyRegistry::new(&config, capabilities);
    let extractor = Extractor::with_registry(config, Variant::Standalone, &registry);

    let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

    assert!(result.is_success());
    assert!(result.text().contains("Hello World"));
    assert_ne!(result.metadata().extraction_method, ExtractionMethod::EnhancedOcr);
}

#[test]
#[cfg(feature = "embedded-text")]
fn test_embedded_pdf_without_text_skips_byte_scan() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "drawing.pdf", &make_drawing_pdf(1));

    let extractor = embedded_extractor(isolated_config(dir.path()));
    let json = as_json(&extractor.extract(&ExtractionRequest::new(path.to_string_lossy())));

    assert_eq!(json["success"], true);
    assert_eq!(json["text"], "");
    assert_eq!(json["error"], "");
    assert_eq!(json["metadata"]["extraction_method"], "embedded_text");
    assert_eq!(json["metadata"]["page_count"], 1);
}

#[test]
fn test_missing_file_embedded_lists_attempted_paths() {
    let dir = tempdir().unwrap();
    let extractor = embedded_extractor(isolated_config(dir.path()));

    let result = extractor.extract(&ExtractionRequest::new("/no/such/file.pdf"));
    let json = as_json(&result);

    assert_eq!(json["success"], false);
    assert_eq!(json["metadata"]["extraction_method"], "failed");
    assert_eq!(json["metadata"]["file_size"], 0);

    let attempted = json["metadata"]["attempted_paths"].as_array().unwrap();
    assert_eq!(attempted[0], "/no/such/file.pdf");
    assert!(attempted.iter().any(|p| p == "/sdcard/Download/file.pdf"));
    assert!(attempted.iter().any(|p| p == "file.pdf"));
    assert!(json["error"].as_str().unwrap().starts_with("PDF file not found"));
}

#[test]
fn test_missing_file_standalone_message() {
    let config = Config::default();
    let registry = StrategyRegistry::new(&config, StrategyCapabilities::compiled());
    let extractor = Extractor::with_registry(config, Variant::Standalone, &registry);

    let result = extractor.extract(&ExtractionRequest::new("/no/such/file.pdf"));

    assert!(!result.is_success());
    assert_eq!(result.error(), "PDF file not found: /no/such/file.pdf");
    assert_eq!(result.metadata().filename, "file.pdf");
}

#[test]
fn test_byte_scan_rejects_non_pdf() {
    let result = ByteScanStrategy::default().scan(b"GIF89a not a pdf at all");

    match result {
        Err(err @ StrategyError::InvalidPdf(_)) => {
            assert_eq!(err.to_string(), "File does not appear to be a valid PDF")
        }
        other => panic!("expected InvalidPdf, got {:?}", other),
    }
}

#[test]
fn test_embedded_non_pdf_file_reports_invalid_pdf() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "notes.pdf", b"plain text pretending to be a pdf");

    let extractor = embedded_extractor(isolated_config(dir.path()));
    let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

    assert!(!result.is_success());
    assert_eq!(result.error(), "File does not appear to be a valid PDF");
    assert_eq!(result.metadata().filename, "notes.pdf");
}

#[test]
fn test_byte_scan_on_unparseable_pdf() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "broken.pdf",
        b"%PDF-1.4\n1 0 obj << /Type /Page >> endobj\nBT (Recovered fragment) Tj ET\n%%EOF",
    );

    let scan = ByteScanStrategy::default();
    let output = scan.extract(&path, "eng").unwrap();

    assert_eq!(output.text, "Recovered fragment");
    assert_eq!(output.method, ExtractionMethod::ByteScan);
    assert_eq!(output.page_count, 1);
}

#[test]
fn test_mocked_short_ocr_attempts_multilingual() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "scan.pdf", &make_pdf(&["x"]));

    let ocr = Arc::new(
        MockStrategy::new("ocr", ExtractionMethod::EnhancedOcr, StrategyCapabilities::OCR)
            .with_text("Short OCR result under one hundred characters."),
    );
    let multilingual = Arc::new(
        MockStrategy::new("multilingual", ExtractionMethod::Multilingual, StrategyCapabilities::MULTILINGUAL)
            .with_text(&"Longer multilingual text. ".repeat(5)),
    );
    let cascade = Cascade::new(
        vec![
            Stage::new(ocr.clone(), StageGate::Always),
            Stage::new(multilingual.clone(), StageGate::BelowChars(100)),
        ],
        StrategyCapabilities::all(),
    );
    let extractor = Extractor::with_cascade(Config::default(), Variant::Standalone, cascade);

    let result = extractor.extract(&ExtractionRequest::new(path.to_string_lossy()));

    assert_eq!(ocr.calls(), 1);
    assert_eq!(multilingual.calls(), 1);
    assert_eq!(result.metadata().extraction_method, ExtractionMethod::Multilingual);
}

#[test]
fn test_embedded_entry_point_returns_compact_json() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "entry.pdf", &make_pdf(&["Text from the entry point"]));

    let json: serde_json::Value = serde_json::from_str(&extract_pdf_text(&path.to_string_lossy(), "eng")).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["metadata"]["language"], "eng");
    assert!(!extract_pdf_text(&path.to_string_lossy(), "eng").contains('\n'));
}

#[test]
fn test_result_keys_always_present() {
    let dir = tempdir().unwrap();
    let valid = write_file(&dir, "ok.pdf", &make_pdf(&["Hello"]));
    let invalid = write_file(&dir, "bad.pdf", b"nope");
    let extractor = embedded_extractor(isolated_config(dir.path()));

    let requests = [
        ExtractionRequest::new(valid.to_string_lossy()),
        ExtractionRequest::new(invalid.to_string_lossy()),
        ExtractionRequest::new("/no/such/file.pdf"),
        ExtractionRequest::new(""),
        ExtractionRequest::new(valid.to_string_lossy()).language("--bad"),
    ];

    for request in &requests {
        let json = as_json(&extractor.extract(request));
        for key in ["success", "text", "error", "metadata"] {
            assert!(json.get(key).is_some(), "missing {} for {:?}", key, request);
        }
        for key in ["filename", "file_size", "language", "extraction_method", "text_length", "page_count"] {
            assert!(json["metadata"].get(key).is_some(), "missing metadata.{} for {:?}", key, request);
        }
    }
}

proptest! {
    #[test]
    fn prop_post_process_is_idempotent(text in "[a-zA-Z .,\\-\t\r\n]{0,120}") {
        let once = post_process(&text);
        prop_assert_eq!(post_process(&once), once);
    }

    #[test]
    fn prop_post_process_is_idempotent_unicode(text in "\\PC{0,80}") {
        let once = post_process(&text);
        prop_assert_eq!(post_process(&once), once);
    }

    #[test]
    fn prop_short_text_is_garbled(text in "[ \t\n]{0,5}[a-zA-Z0-9.]{0,9}[ \t\n]{0,5}") {
        prop_assert!(is_garbled(&text));
    }
}
