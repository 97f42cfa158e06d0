mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Algorithm, Cli, Commands, Format};
use log::LevelFilter;
use squish::{
    cleanup_old_files, format_file_size, generate_unique_filename, BatchCompressor,
    CompressionConfig, Loader, Pipeline,
};
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Compress {
            input,
            output,
            max_width,
            max_height,
            quality,
            format,
            algorithm,
            json,
        } => run_compress(
            input, output, max_width, max_height, quality, format, algorithm, json,
        ),
        Commands::Batch {
            input,
            output,
            max_width,
            max_height,
            quality,
            format,
            algorithm,
            threads,
            recursive,
        } => run_batch(
            input, output, max_width, max_height, quality, format, algorithm, threads, recursive,
        ),
        Commands::Cleanup {
            dirs,
            max_age_minutes,
        } => run_cleanup(dirs, max_age_minutes),
        Commands::Info { input } => run_info(input),
    }
}

fn build_config(
    max_width: u32,
    max_height: u32,
    quality: u8,
    format: Option<Format>,
    algorithm: Algorithm,
) -> CompressionConfig {
    CompressionConfig {
        max_width,
        max_height,
        quality,
        format: format.map(Into::into),
        algorithm: algorithm.into(),
    }
}

fn run_compress(
    input: PathBuf,
    output: Option<PathBuf>,
    max_width: u32,
    max_height: u32,
    quality: u8,
    format: Option<Format>,
    algorithm: Algorithm,
    json: bool,
) -> Result<()> {
    let config = build_config(max_width, max_height, quality, format, algorithm);

    let output = match output {
        Some(path) => path,
        None => {
            let name = input
                .file_name()
                .and_then(|n| n.to_str())
                .context("input path has no usable file name")?;
            input.with_file_name(generate_unique_filename(name, config.format))
        }
    };

    let pipeline = Pipeline::new(config)?;
    let result = pipeline
        .compress(&input, &output)
        .with_context(|| format!("failed to compress {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Compressed image saved to: {}", output.display());
        println!(
            "  size: {} -> {} ({}% reduction)",
            format_file_size(result.original_size),
            format_file_size(result.compressed_size),
            result.reduction_percent
        );
        println!(
            "  dimensions: {} -> {}",
            result.original_dimensions, result.new_dimensions
        );
    }

    Ok(())
}

fn run_batch(
    input: PathBuf,
    output: PathBuf,
    max_width: u32,
    max_height: u32,
    quality: u8,
    format: Option<Format>,
    algorithm: Algorithm,
    threads: usize,
    recursive: bool,
) -> Result<()> {
    let config = build_config(max_width, max_height, quality, format, algorithm);

    let compressor = BatchCompressor::new(config, threads)?;
    let summary = compressor
        .compress_directory(&input, &output, recursive)
        .with_context(|| format!("failed to process {}", input.display()))?;

    println!(
        "Batch complete: {} compressed into {} ({} -> {}, {}% smaller)",
        summary.processed,
        output.display(),
        format_file_size(summary.total_original_bytes),
        format_file_size(summary.total_compressed_bytes),
        summary.overall_reduction_percent()
    );

    for (path, message) in &summary.failures {
        eprintln!("  failed: {}: {}", path.display(), message);
    }

    Ok(())
}

fn run_cleanup(dirs: Vec<PathBuf>, max_age_minutes: u64) -> Result<()> {
    let max_age = Duration::from_secs(max_age_minutes * 60);

    let removed: usize = dirs.iter().map(|dir| cleanup_old_files(dir, max_age)).sum();
    println!("Removed {} expired files", removed);

    Ok(())
}

fn run_info(input: PathBuf) -> Result<()> {
    let metadata = std::fs::metadata(&input)
        .with_context(|| format!("cannot stat {}", input.display()))?;

    let (width, height, format) = Loader::new().probe(&input)?;

    println!("File: {}", input.display());
    println!("Size: {}", format_file_size(metadata.len()));
    println!("Dimensions: {} x {} pixels", width, height);
    println!("Format: {}", format);

    Ok(())
}
