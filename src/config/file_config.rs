//! Configuration file support.
//!
//! Reading goes through [`super::load_config`] so environment overrides
//! apply; this module handles the plain TOML round trip used by
//! `--init-config`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [resolver]
//! fallback_dirs = ["/android_asset", "/sdcard/Download"]
//! search_roots = ["/data", "/storage"]
//! max_search_depth = 12
//!
//! [cascade]
//! ocr_min_chars = 100
//! fallback_min_chars = 50
//! byte_scan_max_fragments = 50
//!
//! [ocr]
//! dpi = 300
//! primary_psm = 6
//! fallback_psm = 3
//! tesseract_bin = "tesseract"
//!
//! [postprocess]
//! fix_digraphs = false
//!
//! [logging]
//! level = "warn"
//! format = "text"
//! ```

use std::path::Path;

use super::Config;

impl Config {
    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
