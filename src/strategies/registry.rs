//! Registry for extraction strategy plugins.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ByteScanStrategy, ExtractionStrategy};
use crate::config::Config;
use crate::utils::tools;

#[cfg(feature = "embedded-text")]
use super::EmbeddedTextStrategy;
#[cfg(feature = "multilingual")]
use super::MultilingualStrategy;
#[cfg(feature = "ocr")]
use super::OcrStrategy;

bitflags::bitflags! {
    /// Capabilities a strategy can require
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StrategyCapabilities: u32 {
        const EMBEDDED_TEXT = 1 << 0;
        const MULTILINGUAL = 1 << 1;
        const OCR = 1 << 2;
        const BYTE_SCAN = 1 << 3;
    }
}

impl StrategyCapabilities {
    /// Capabilities compiled into this build
    pub fn compiled() -> Self {
        let mut caps = StrategyCapabilities::BYTE_SCAN;
        if cfg!(feature = "embedded-text") {
            caps |= StrategyCapabilities::EMBEDDED_TEXT;
        }
        if cfg!(feature = "multilingual") {
            caps |= StrategyCapabilities::MULTILINGUAL;
        }
        if cfg!(feature = "ocr") {
            caps |= StrategyCapabilities::OCR;
        }
        caps
    }

    /// Compiled capabilities narrowed by probing for external tools
    pub fn detect(config: &Config) -> Self {
        let mut caps = Self::compiled();

        if caps.contains(StrategyCapabilities::OCR) {
            let rasterizer = tools::command_available(&config.ocr.pdftoppm_bin, "-v");
            let recognizer = tools::command_available(&config.ocr.tesseract_bin, "--version");
            if !(rasterizer && recognizer) {
                tracing::info!(
                    "OCR disabled: {}={}, {}={}",
                    config.ocr.pdftoppm_bin,
                    rasterizer,
                    config.ocr.tesseract_bin,
                    recognizer
                );
                caps.remove(StrategyCapabilities::OCR);
            }
        }

        tracing::debug!("Detected capabilities: {:?}", caps);
        caps
    }
}

/// Registry of all compiled extraction strategies
///
/// The registry owns the strategies and the capability set injected at
/// startup. [`crate::cascade::Cascade`] arranges them into stages.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn ExtractionStrategy>>,
    capabilities: StrategyCapabilities,
}

impl StrategyRegistry {
    /// Create a registry with every compiled strategy
    pub fn new(config: &Config, capabilities: StrategyCapabilities) -> Self {
        let mut registry = Self::empty(capabilities);

        #[cfg(feature = "ocr")]
        registry.register(Arc::new(OcrStrategy::new(config.ocr.clone())));
        #[cfg(feature = "multilingual")]
        registry.register(Arc::new(MultilingualStrategy::new()));
        #[cfg(feature = "embedded-text")]
        registry.register(Arc::new(EmbeddedTextStrategy::new()));
        registry.register(Arc::new(ByteScanStrategy::new(config.cascade.byte_scan_max_fragments)));

        registry
    }

    /// Create a registry without strategies
    pub fn empty(capabilities: StrategyCapabilities) -> Self {
        Self {
            strategies: HashMap::new(),
            capabilities,
        }
    }

    /// Register a strategy, replacing any with the same id
    pub fn register(&mut self, strategy: Arc<dyn ExtractionStrategy>) {
        self.strategies.insert(strategy.id().to_string(), strategy);
    }

    /// Get a strategy by id
    pub fn get(&self, id: &str) -> Option<&Arc<dyn ExtractionStrategy>> {
        self.strategies.get(id)
    }

    /// Capabilities injected at startup
    pub fn capabilities(&self) -> StrategyCapabilities {
        self.capabilities
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new(&Config::default(), StrategyCapabilities::compiled())
    }
}
