//! Raster cleanup before text recognition.
//!
//! Grayscale, Gaussian blur, adaptive threshold, morphological close, then an
//! upscale so the smaller side reaches a minimum size.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::adaptive_threshold;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

use crate::config::OcrConfig;

/// Parameters of [`preprocess`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    pub blur_sigma: f32,
    pub threshold_block_radius: u32,
    pub close_radius: u8,
    pub min_dimension: u32,
}

impl From<&OcrConfig> for PreprocessOptions {
    fn from(config: &OcrConfig) -> Self {
        Self {
            blur_sigma: config.blur_sigma,
            threshold_block_radius: config.threshold_block_radius,
            close_radius: config.close_radius,
            min_dimension: config.min_dimension,
        }
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self::from(&OcrConfig::default())
    }
}

/// Run the filter chain on a decoded image
pub fn preprocess(image: &DynamicImage, options: &PreprocessOptions) -> GrayImage {
    let gray = image.to_luma8();

    let blurred = if options.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, options.blur_sigma)
    } else {
        gray
    };

    let binary = adaptive_threshold(&blurred, options.threshold_block_radius);
    let closed = close(&binary, Norm::LInf, options.close_radius);

    upscale_to_min(closed, options.min_dimension)
}

/// Upscale with a cubic filter so `min(width, height) >= min_dimension`,
/// keeping the aspect ratio; larger images are returned untouched
pub fn upscale_to_min(image: GrayImage, min_dimension: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let smaller = width.min(height);
    if smaller == 0 || smaller >= min_dimension {
        return image;
    }

    let scale = f64::from(min_dimension) / f64::from(smaller);
    let new_width = ((f64::from(width) * scale).round() as u32).max(min_dimension);
    let new_height = ((f64::from(height) * scale).round() as u32).max(min_dimension);

    image::imageops::resize(&image, new_width, new_height, FilterType::CatmullRom)
}

/// Load `input`, preprocess it and write the result to `output` as PNG
pub fn preprocess_file(input: &Path, output: &Path, options: &PreprocessOptions) -> Result<(), image::ImageError> {
    let image = image::open(input)?;
    preprocess(&image, options).save(output)
}
