// squish/src/processors/loader.rs
use crate::core::{CompressionError, Result};
use crate::utils::image_format_name;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Upper bound on decoded dimensions, a sanity guard against decompression
// bombs rather than a business rule.
const MAX_DECODE_DIMENSION: u32 = 100_000;

#[derive(Clone, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    // Reads the raw bytes first and decodes from memory, so decoding never
    // depends on how the filesystem encodes the path (non-ASCII names work).
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("loading image from {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            CompressionError::Decode(format!("cannot read {}: {}", path.display(), e))
        })?;

        self.decode(&bytes)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(CompressionError::Decode("input is empty".to_string()));
        }

        let image = image::load_from_memory(bytes)
            .map_err(|e| CompressionError::Decode(format!("unreadable image: {}", e)))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CompressionError::Decode(
                "image has zero pixel area".to_string(),
            ));
        }

        if width > MAX_DECODE_DIMENSION || height > MAX_DECODE_DIMENSION {
            return Err(CompressionError::Decode(format!(
                "image dimensions {}x{} exceed the decode limit",
                width, height
            )));
        }

        log::debug!(
            "decoded {}x{} pixels, color {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    // Header-only probe: dimensions and container format without a full decode.
    pub fn probe(&self, path: &Path) -> Result<(u32, u32, String)> {
        let file = File::open(path).map_err(|e| {
            CompressionError::Decode(format!("cannot open {}: {}", path.display(), e))
        })?;

        let reader = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(|e| {
                CompressionError::Decode(format!("cannot probe {}: {}", path.display(), e))
            })?;

        let format = reader
            .format()
            .map(image_format_name)
            .unwrap_or("unknown")
            .to_string();

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CompressionError::Decode(format!("cannot read dimensions: {}", e)))?;

        Ok((width, height, format))
    }
}
