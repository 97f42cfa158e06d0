// squish/src/processors/encoder.rs
use crate::core::{CompressionError, OutputFormat, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use oxipng::{optimize_from_memory, Options};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

// Reinterprets the decoded buffer into a standard channel layout before
// encoding: three-channel data becomes interleaved RGB8, alpha-carrying data
// RGBA8, grayscale passes through untouched.
pub fn normalize_colors(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        other => {
            if other.color().has_alpha() {
                DynamicImage::ImageRgba8(other.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(other.to_rgb8())
            }
        }
    }
}

pub struct Encoder {
    quality: u8,
}

impl Encoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
        }
    }

    pub fn encode(&self, image: &DynamicImage, path: &Path, format: OutputFormat) -> Result<()> {
        log::debug!(
            "encoding {} as {} (quality {})",
            path.display(),
            format,
            self.quality
        );

        match format {
            OutputFormat::Jpeg => self.encode_jpeg(image, path),
            OutputFormat::Png => self.encode_png(image, path),
            OutputFormat::WebP => self.encode_webp(image, path),
            OutputFormat::Gif | OutputFormat::Bmp => self.encode_default(image, path, format),
        }?;

        if let Ok(metadata) = std::fs::metadata(path) {
            log::debug!("wrote {} ({} bytes)", path.display(), metadata.len());
        }

        Ok(())
    }

    fn encode_jpeg(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        // JPEG carries no alpha channel; grayscale encodes as-is.
        let image = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image.clone(),
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageLuma8(image.to_luma8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        let file = create_output(path)?;
        let writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(writer, self.quality);

        image
            .write_with_encoder(encoder)
            .map_err(|e| CompressionError::Encode(format!("jpeg encode failed: {}", e)))
    }

    // Lossless encode followed by an oxipng pass; the quality knob does not
    // apply to PNG.
    fn encode_png(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|e| CompressionError::Encode(format!("png encode failed: {}", e)))?;

        let optimized = optimize_from_memory(buffer.get_ref(), &Options::default())
            .map_err(|e| CompressionError::Encode(format!("png optimization failed: {}", e)))?;

        std::fs::write(path, optimized).map_err(|e| {
            CompressionError::Encode(format!("cannot write {}: {}", path.display(), e))
        })
    }

    // The image crate's 0.25 WebP encoder is lossless-only, so lossy encoding
    // goes through the webp crate, which accepts RGB8 or RGBA8 buffers.
    fn encode_webp(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let image = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image.clone(),
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        let encoder = webp::Encoder::from_image(&image)
            .map_err(|e| CompressionError::Encode(format!("webp encode failed: {}", e)))?;
        let encoded = encoder.encode(self.quality as f32);

        std::fs::write(path, &*encoded).map_err(|e| {
            CompressionError::Encode(format!("cannot write {}: {}", path.display(), e))
        })
    }

    // GIF and BMP use the codec defaults; quality is ignored.
    fn encode_default(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<()> {
        let image = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image.clone(),
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        let file = create_output(path)?;
        let mut writer = BufWriter::new(file);

        image
            .write_to(&mut writer, format.image_format())
            .map_err(|e| CompressionError::Encode(format!("{} encode failed: {}", format, e)))?;

        writer.flush().map_err(|e| {
            CompressionError::Encode(format!("cannot write {}: {}", path.display(), e))
        })
    }
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|e| CompressionError::Encode(format!("cannot create {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_depth_rgb_normalizes_to_rgb8() {
        let image = DynamicImage::ImageRgb16(image::ImageBuffer::new(2, 2));
        assert!(matches!(
            normalize_colors(image),
            DynamicImage::ImageRgb8(_)
        ));
    }

    #[test]
    fn alpha_images_normalize_to_rgba8() {
        let image = DynamicImage::ImageRgba16(image::ImageBuffer::new(2, 2));
        assert!(matches!(
            normalize_colors(image),
            DynamicImage::ImageRgba8(_)
        ));
    }

    #[test]
    fn grayscale_passes_through() {
        let image = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        assert!(matches!(
            normalize_colors(image),
            DynamicImage::ImageLuma8(_)
        ));
    }
}
