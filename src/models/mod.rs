//! Core data models for extraction requests and results.

mod request;
mod result;

pub(crate) use request::file_name_or_unknown;
pub use request::{ExtractionRequest, DEFAULT_LANGUAGE};
pub use result::{ExtractionMetadata, ExtractionMethod, ExtractionResult};
