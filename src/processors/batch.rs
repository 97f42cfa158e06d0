use crate::core::pipeline::Pipeline;
use crate::core::{
    reduction_percent, CompressionConfig, CompressionError, CompressionResult, Result,
};
use crate::storage::generate_unique_filename;
use crate::utils::is_allowed_extension;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn overall_reduction_percent(&self) -> f64 {
        reduction_percent(self.total_original_bytes, self.total_compressed_bytes)
    }
}

pub struct BatchCompressor {
    config: CompressionConfig,
    thread_pool: Option<rayon::ThreadPool>,
}

impl BatchCompressor {
    pub fn new(config: CompressionConfig, max_threads: usize) -> Result<Self> {
        config.validate()?;

        let thread_pool = if max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map_err(|e| {
                    CompressionError::InvalidParameter(format!(
                        "cannot create thread pool: {}",
                        e
                    ))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            thread_pool,
        })
    }

    pub fn compress_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        recursive: bool,
    ) -> Result<BatchSummary> {
        self.validate_dirs(input_dir, output_dir)?;

        let inputs = collect_image_paths(input_dir, recursive);
        if inputs.is_empty() {
            log::warn!("no image files found in {}", input_dir.display());
            return Ok(BatchSummary::default());
        }

        log::info!(
            "compressing {} images from {}",
            inputs.len(),
            input_dir.display()
        );

        fs::create_dir_all(output_dir).map_err(|e| {
            CompressionError::Encode(format!("cannot create {}: {}", output_dir.display(), e))
        })?;

        Ok(self.compress_files(&inputs, output_dir))
    }

    // One file's failure never aborts the run; it lands in the summary.
    pub fn compress_files(&self, inputs: &[PathBuf], output_dir: &Path) -> BatchSummary {
        let pb = create_progress_bar(inputs.len());

        let run = || {
            inputs
                .par_iter()
                .progress_with(pb.clone())
                .map(|input| self.compress_one(input, output_dir))
                .collect::<Vec<_>>()
        };

        let results = match &self.thread_pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut summary = BatchSummary::default();
        for result in results {
            match result {
                Ok(stats) => {
                    summary.processed += 1;
                    summary.total_original_bytes += stats.original_size;
                    summary.total_compressed_bytes += stats.compressed_size;
                }
                Err((path, message)) => {
                    log::warn!("failed to compress {}: {}", path.display(), message);
                    summary.failures.push((path, message));
                }
            }
        }

        pb.finish_with_message(format!(
            "{} compressed, {} failed ({}% smaller overall)",
            summary.processed,
            summary.failures.len(),
            summary.overall_reduction_percent()
        ));

        summary
    }

    fn compress_one(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> std::result::Result<CompressionResult, (PathBuf, String)> {
        let fail = |message: String| (input.to_path_buf(), message);

        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| fail("invalid file name".to_string()))?;

        // Unique artifact names keep parallel workers from ever colliding.
        let output = output_dir.join(generate_unique_filename(name, self.config.format));

        let pipeline = Pipeline::new(self.config.clone()).map_err(|e| fail(e.to_string()))?;
        pipeline
            .compress(input, &output)
            .map_err(|e| fail(e.to_string()))
    }

    fn validate_dirs(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(CompressionError::InvalidParameter(format!(
                "input directory does not exist: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(CompressionError::InvalidParameter(format!(
                "output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        if input_dir == output_dir {
            return Err(CompressionError::InvalidParameter(
                "input and output directories cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}

fn collect_image_paths(input_dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(input_dir)
    } else {
        WalkDir::new(input_dir).max_depth(1)
    };

    walker
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_allowed_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
