//! Configuration management.
//!
//! Every section is serde-defaulted, so an empty file (or no file at all)
//! yields the built-in behaviour. Values can be overridden with environment
//! variables of the form `PDF_TEXT_EXTRACTOR__SECTION__KEY`, for example
//! `PDF_TEXT_EXTRACTOR__CASCADE__OCR_MIN_CHARS=200`.

mod file_config;

pub use file_config::ConfigFileError;

pub use ::config::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "PDF_TEXT_EXTRACTOR";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "pdf-text-extractor.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to look for files that are not at their nominal path
    pub resolver: ResolverConfig,

    /// Stage thresholds of the extraction cascade
    pub cascade: CascadeConfig,

    /// Rasterization and recognition settings
    pub ocr: OcrConfig,

    /// Text cleanup options
    pub postprocess: PostProcessConfig,

    /// Log level and output format
    pub logging: LoggingConfig,
}

/// Path resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directories joined with the file name, probed in order
    pub fallback_dirs: Vec<PathBuf>,

    /// Roots searched recursively for the file name
    pub search_roots: Vec<PathBuf>,

    /// Maximum directory depth of the recursive search
    pub max_search_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_dirs: [
                "/android_asset",
                "/data/data/com.chatwithpdf/assets",
                "/data/data/com.chatwithpdf/files",
                "/storage/emulated/0/Download",
                "/sdcard/Download",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            search_roots: ["/data", "/storage", "/android_asset"]
                .iter()
                .map(PathBuf::from)
                .collect(),
            max_search_depth: 12,
        }
    }
}

/// Cascade stage thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// The multilingual stage runs while the best text is shorter than this
    pub ocr_min_chars: usize,

    /// The embedded-text stage runs while the best text is shorter than this
    pub fallback_min_chars: usize,

    /// Maximum number of fragments kept by the byte scan
    pub byte_scan_max_fragments: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            ocr_min_chars: 100,
            fallback_min_chars: 50,
            byte_scan_max_fragments: 50,
        }
    }
}

/// OCR settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Rasterization resolution
    pub dpi: u32,

    /// Smaller image dimension is upscaled to at least this many pixels
    pub min_dimension: u32,

    /// Gaussian blur sigma
    pub blur_sigma: f32,

    /// Adaptive threshold block radius
    pub threshold_block_radius: u32,

    /// Morphological close radius
    pub close_radius: u8,

    /// Tesseract OCR engine mode
    pub oem: u8,

    /// Page segmentation mode of the first pass
    pub primary_psm: u8,

    /// Page segmentation mode of the retry on garbled output
    pub fallback_psm: u8,

    /// Characters tesseract may emit on the first pass (empty disables)
    pub char_whitelist: String,

    /// Rasterizer executable
    pub pdftoppm_bin: String,

    /// Recognizer executable
    pub tesseract_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            min_dimension: 300,
            blur_sigma: 0.8,
            threshold_block_radius: 5,
            close_radius: 1,
            oem: 3,
            primary_psm: 6,
            fallback_psm: 3,
            char_whitelist: concat!(
                "0123456789",
                "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
                "abcdefghijklmnopqrstuvwxyz",
                ".,;:!?()[]{}+-=*/\\<>@#$%^&|~`\"' "
            )
            .to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

/// Post-processing settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Rewrite standalone `rn`/`vv` tokens to `m`/`w`
    pub fix_digraphs: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `-v`/`-q` decide
    pub level: String,

    /// Output format of log lines
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Load configuration from an optional TOML file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(::config::File::from(path));
    }

    let settings = builder
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("resolver.fallback_dirs")
                .with_list_parse_key("resolver.search_roots"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the working directory or the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("pdf-text-extractor").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration with environment overrides applied
pub fn get_config() -> Config {
    load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid environment configuration: {}", e);
        Config::default()
    })
}
