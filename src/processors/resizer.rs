// squish/src/processors/resizer.rs
use crate::core::ResizeAlgorithm;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

// Plans a downscale that fits `width x height` inside `max_width x max_height`
// while preserving aspect ratio. Returns None when the image already fits;
// the scaling ratio is always below 1 (images are never upscaled).
pub fn plan_bounded_fit(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }

    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    let new_width = (width as f64 * ratio).round().max(1.0) as u32;
    let new_height = (height as f64 * ratio).round().max(1.0) as u32;

    Some((new_width, new_height))
}

pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn apply(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if (width, height) == image.dimensions() {
            return image.clone();
        }

        image.resize_exact(width, height, self.filter())
    }

    fn filter(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
