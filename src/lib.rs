//! # PDF Text Extractor
//!
//! Extracts text from PDF files through a cascade of strategies and reports
//! the outcome as JSON.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Request, result and metadata types
//! - [`strategies`]: Extraction strategy plugins with a trait-based architecture
//! - [`cascade`]: Ordered, gated evaluation of strategies
//! - [`extractor`]: Path resolution, cascade run and result building
//! - [`utils`]: Path resolver, text heuristics, post-processing and helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use pdf_text_extractor::{config::Config, ExtractionRequest, Extractor, Variant};
//!
//! let extractor = Extractor::new(Config::default(), Variant::Standalone);
//! let result = extractor.extract(&ExtractionRequest::new("scan.pdf").language("deu"));
//! println!("{}", result.to_json_pretty());
//! ```

pub mod cascade;
pub mod config;
pub mod extractor;
pub mod models;
pub mod strategies;
pub mod utils;

// Re-export commonly used types
pub use cascade::{Cascade, Stage, StageGate};
pub use extractor::{extract_pdf_text, ExtractError, Extractor, Variant};
pub use models::{ExtractionMetadata, ExtractionMethod, ExtractionRequest, ExtractionResult};
pub use strategies::{ExtractionStrategy, StrategyCapabilities, StrategyRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
