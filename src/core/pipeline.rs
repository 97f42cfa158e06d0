// squish/src/core/pipeline.rs
use super::{CompressionConfig, CompressionError, CompressionResult, OutputFormat, Result};
use crate::processors::{normalize_colors, plan_bounded_fit, Encoder, Loader, Resizer};
use image::GenericImageView;
use std::fs;
use std::path::Path;

pub struct Pipeline {
    config: CompressionConfig,
    loader: Loader,
    resizer: Resizer,
    encoder: Encoder,
}

impl Pipeline {
    pub fn new(config: CompressionConfig) -> Result<Self> {
        config.validate()?;

        let resizer = Resizer::new(config.algorithm);
        let encoder = Encoder::new(config.quality);

        Ok(Self {
            config,
            loader: Loader::new(),
            resizer,
            encoder,
        })
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn compress(&self, input_path: &Path, output_path: &Path) -> Result<CompressionResult> {
        let original_size = fs::metadata(input_path)
            .map_err(|e| {
                CompressionError::Decode(format!("cannot stat {}: {}", input_path.display(), e))
            })?
            .len();

        let image = self.loader.load(input_path)?;
        let (original_width, original_height) = image.dimensions();

        let image = match plan_bounded_fit(
            original_width,
            original_height,
            self.config.max_width,
            self.config.max_height,
        ) {
            Some((width, height)) => {
                log::debug!(
                    "resizing {}x{} to {}x{}",
                    original_width,
                    original_height,
                    width,
                    height
                );
                self.resizer.apply(&image, width, height)
            }
            None => image,
        };

        let image = normalize_colors(image);
        let (new_width, new_height) = image.dimensions();

        let format = self
            .config
            .format
            .unwrap_or_else(|| OutputFormat::from_path(input_path));

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CompressionError::Encode(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        self.encoder.encode(&image, output_path, format)?;

        let compressed_size = fs::metadata(output_path)
            .map_err(|e| {
                CompressionError::Encode(format!("cannot stat {}: {}", output_path.display(), e))
            })?
            .len();

        let result = CompressionResult::new(
            original_size,
            compressed_size,
            (original_width, original_height),
            (new_width, new_height),
        );

        log::info!(
            "compressed {} -> {} ({}% smaller)",
            input_path.display(),
            output_path.display(),
            result.reduction_percent
        );

        Ok(result)
    }
}
