//! Mock strategy for testing purposes.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::ExtractionMethod;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyError, StrategyOutput};

#[derive(Debug, Clone)]
enum MockResponse {
    Text(String),
    Fail(String),
}

/// A mock strategy that returns a preset response and counts its calls.
///
/// Clones share the response and the call counter.
#[derive(Debug, Clone)]
pub struct MockStrategy {
    id: String,
    method: ExtractionMethod,
    capability: StrategyCapabilities,
    available: bool,
    response: Arc<Mutex<MockResponse>>,
    calls: Arc<AtomicUsize>,
}

impl MockStrategy {
    /// Create a mock that returns empty text
    pub fn new(id: &str, method: ExtractionMethod, capability: StrategyCapabilities) -> Self {
        Self {
            id: id.to_string(),
            method,
            capability,
            available: true,
            response: Arc::new(Mutex::new(MockResponse::Text(String::new()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `text` from every call
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Fail every call with `message`
    pub fn failing(self, message: &str) -> Self {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = MockResponse::Fail(message.to_string());
        self
    }

    /// Report the strategy as unavailable
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Replace the text returned by later calls
    pub fn set_text(&self, text: &str) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = MockResponse::Text(text.to_string());
    }

    /// Number of times `extract` ran
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExtractionStrategy for MockStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn method(&self) -> ExtractionMethod {
        self.method
    }

    fn capability(&self) -> StrategyCapabilities {
        self.capability
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn extract(&self, _path: &Path, _language: &str) -> Result<StrategyOutput, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self.response.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match response {
            MockResponse::Text(text) => Ok(StrategyOutput::new(text, self.method).with_pages(1)),
            MockResponse::Fail(message) => Err(StrategyError::Pdf(message)),
        }
    }
}

/// Helper function to build an in-memory PDF with one text line per page.
pub fn make_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::Operation;
    use lopdf::Object;

    build_pdf(
        pages
            .iter()
            .map(|text| {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            })
            .collect(),
    )
}

/// Helper function to build an in-memory PDF whose pages only draw a line.
pub fn make_drawing_pdf(pages: usize) -> Vec<u8> {
    use lopdf::content::Operation;

    let line = || {
        vec![
            Operation::new("m", vec![72.into(), 72.into()]),
            Operation::new("l", vec![540.into(), 720.into()]),
            Operation::new("S", vec![]),
        ]
    };
    build_pdf((0..pages).map(|_| line()).collect())
}

fn build_pdf(contents: Vec<Vec<lopdf::content::Operation>>) -> Vec<u8> {
    use lopdf::content::Content;
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in contents {
        let encoded = Content { operations }.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    // Writing to a Vec cannot fail
    let _ = doc.save_to(&mut bytes);
    bytes
}
