//! Enhanced OCR: rasterize with pdftoppm, clean up, recognise with tesseract.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::OcrConfig;
use crate::models::ExtractionMethod;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyError, StrategyOutput};
use crate::utils::preprocess::{preprocess_file, PreprocessOptions};
use crate::utils::text::{is_garbled, join_pages, trimmed_len};
use crate::utils::tools::{self, ToolError};

/// OCR over every page of the document
#[derive(Debug, Clone)]
pub struct OcrStrategy {
    config: OcrConfig,
}

impl OcrStrategy {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Render every page to PNG inside `dir`, returning the files in page order
    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, StrategyError> {
        let prefix = dir.join("page");
        tools::run(
            Command::new(&self.config.pdftoppm_bin)
                .arg("-r")
                .arg(self.config.dpi.to_string())
                .arg("-png")
                .arg(pdf)
                .arg(&prefix),
        )
        .map_err(tool_error)?;

        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "png")
                    && path
                        .file_name()
                        .is_some_and(|name| name.to_string_lossy().starts_with("page"))
            })
            .collect();
        // pdftoppm zero-pads page numbers to a common width
        pages.sort();

        Ok(pages)
    }

    /// Run tesseract on one image with the given segmentation mode
    fn recognize(&self, image: &Path, language: &str, psm: u8, whitelist: bool) -> Result<String, StrategyError> {
        let mut command = Command::new(&self.config.tesseract_bin);
        command
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(psm.to_string());

        if whitelist && !self.config.char_whitelist.is_empty() {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={}", self.config.char_whitelist));
        }

        let stdout = tools::run(&mut command).map_err(tool_error)?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Recognise one page, retrying with the fallback segmentation mode when
    /// the first pass looks garbled
    fn recognize_page(&self, image: &Path, language: &str) -> Result<String, StrategyError> {
        let text = self.recognize(image, language, self.config.primary_psm, true)?;
        if !is_garbled(&text) {
            return Ok(text);
        }

        tracing::debug!("Garbled OCR output on {}, retrying", image.display());
        match self.recognize(image, language, self.config.fallback_psm, false) {
            Ok(retry) if trimmed_len(&retry) > trimmed_len(&text) && !is_garbled(&retry) => Ok(retry),
            Ok(_) => Ok(text),
            Err(e) => {
                tracing::warn!("OCR retry failed on {}: {}", image.display(), e);
                Ok(text)
            }
        }
    }
}

fn tool_error(err: ToolError) -> StrategyError {
    StrategyError::Tool(err.to_string())
}

impl ExtractionStrategy for OcrStrategy {
    fn id(&self) -> &str {
        "ocr"
    }

    fn name(&self) -> &str {
        "Enhanced OCR"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::EnhancedOcr
    }

    fn capability(&self) -> StrategyCapabilities {
        StrategyCapabilities::OCR
    }

    fn extract(&self, path: &Path, language: &str) -> Result<StrategyOutput, StrategyError> {
        let workdir = tempfile::Builder::new().prefix("pdf-ocr-").tempdir()?;
        let rasters = self.rasterize(path, workdir.path())?;
        if rasters.is_empty() {
            return Err(StrategyError::Tool(format!(
                "{} produced no images",
                self.config.pdftoppm_bin
            )));
        }

        let options = PreprocessOptions::from(&self.config);
        let mut texts = Vec::with_capacity(rasters.len());
        let mut failed = 0;

        for (index, raster) in rasters.iter().enumerate() {
            let page = index + 1;
            let processed = workdir.path().join(format!("processed-{:04}.png", page));

            let image = match preprocess_file(raster, &processed, &options) {
                Ok(()) => processed.as_path(),
                Err(e) => {
                    tracing::warn!("Preprocessing failed on page {}, using raw raster: {}", page, e);
                    raster.as_path()
                }
            };

            match self.recognize_page(image, language) {
                Ok(text) => {
                    tracing::debug!("OCR page {}: {} chars", page, trimmed_len(&text));
                    texts.push(text);
                }
                Err(e) => {
                    tracing::warn!("OCR failed on page {}: {}", page, e);
                    failed += 1;
                }
            }
        }

        if failed == rasters.len() {
            return Err(StrategyError::NoPages(failed));
        }

        Ok(StrategyOutput::new(join_pages(texts), self.method())
            .with_pages(rasters.len())
            .with_failed_pages(failed))
    }
}
