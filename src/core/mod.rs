// squish/src/core/mod.rs
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub mod pipeline;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => OutputFormat::Jpeg,
            "png" => OutputFormat::Png,
            "webp" => OutputFormat::WebP,
            "gif" => OutputFormat::Gif,
            "bmp" => OutputFormat::Bmp,
            // Unrecognized extensions fall back to JPEG, matching the
            // documented default of the service.
            _ => OutputFormat::Jpeg,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(OutputFormat::Jpeg)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::WebP => image::ImageFormat::WebP,
            OutputFormat::Gif => image::ImageFormat::Gif,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone)]
pub struct CompressionConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    // None keeps the source format
    pub format: Option<OutputFormat>,
    pub algorithm: ResizeAlgorithm,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 1280,
            quality: 85,
            format: None,
            algorithm: ResizeAlgorithm::Lanczos3,
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompressionError::InvalidParameter(
                "max width and height must be greater than zero".to_string(),
            ));
        }

        if self.quality > 100 {
            return Err(CompressionError::InvalidParameter(
                "quality must be between 0 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("cleanup failed: {0}")]
    CleanupIo(std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompressionError>;

#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    pub original_size: u64,
    pub compressed_size: u64,
    pub original_dimensions: String,
    pub new_dimensions: String,
    pub reduction_percent: f64,
}

impl CompressionResult {
    pub fn new(
        original_size: u64,
        compressed_size: u64,
        original_dimensions: (u32, u32),
        new_dimensions: (u32, u32),
    ) -> Self {
        Self {
            original_size,
            compressed_size,
            original_dimensions: format!("{}x{}", original_dimensions.0, original_dimensions.1),
            new_dimensions: format!("{}x{}", new_dimensions.0, new_dimensions.1),
            reduction_percent: reduction_percent(original_size, compressed_size),
        }
    }
}

// Relative shrinkage in percent, rounded to two decimals. Negative when the
// output grew; zero-byte originals report 0 rather than dividing by zero.
pub fn reduction_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }

    let reduction = (1.0 - compressed as f64 / original as f64) * 100.0;
    (reduction * 100.0).round() / 100.0
}
