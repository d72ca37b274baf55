//! Utility modules supporting extraction.
//!
//! - [`PathResolver`]: Locate a PDF whose nominal path does not exist
//! - [`is_garbled`]: Heuristic check for corrupted OCR output
//! - [`post_process`]: Idempotent cleanup of extracted text
//! - [`validate_language`]: Check a language code before it reaches tesseract
//!
//! # Text cleanup
//!
//! ```rust
//! use pdf_text_extractor::utils::{is_garbled, post_process};
//!
//! let cleaned = post_process("extrac-\ntion   of  text");
//! assert_eq!(cleaned, "extraction of text");
//! assert!(is_garbled("short"));
//! ```

#[cfg(feature = "multilingual")]
pub mod pdf;
#[cfg(feature = "ocr")]
pub mod preprocess;
pub mod resolver;
pub mod text;
pub mod tools;
pub mod validate;

pub use resolver::{FileProbe, FsProbe, PathResolver, Resolution};
pub use text::{is_garbled, post_process, post_process_with, PostProcessOptions};
pub use validate::{validate_language, validate_pdf_path, ValidationError};
