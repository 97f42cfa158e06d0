// squish/src/cli.rs
use clap::{Parser, Subcommand, ValueEnum};
use squish::{OutputFormat, ResizeAlgorithm};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "squish",
    version,
    about = "Compress and resize images, with staged-artifact cleanup"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a single image
    Compress {
        /// Input image file
        input: PathBuf,

        /// Output path; defaults to a uniquely named sibling of the input
        output: Option<PathBuf>,

        /// Maximum output width in pixels
        #[arg(long, default_value_t = 1280)]
        max_width: u32,

        /// Maximum output height in pixels
        #[arg(long, default_value_t = 1280)]
        max_height: u32,

        /// Encoding quality (0-100; ignored by lossless formats)
        #[arg(short, long, default_value_t = 85)]
        quality: u8,

        /// Target format; defaults to the source format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Resize filter
        #[arg(long, value_enum, default_value = "lanczos3")]
        algorithm: Algorithm,

        /// Print the result record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress every image in a directory
    Batch {
        /// Directory of staged input images
        input: PathBuf,

        /// Directory for compressed artifacts
        output: PathBuf,

        /// Maximum output width in pixels
        #[arg(long, default_value_t = 1280)]
        max_width: u32,

        /// Maximum output height in pixels
        #[arg(long, default_value_t = 1280)]
        max_height: u32,

        /// Encoding quality (0-100; ignored by lossless formats)
        #[arg(short, long, default_value_t = 85)]
        quality: u8,

        /// Target format; defaults to each file's source format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Resize filter
        #[arg(long, value_enum, default_value = "lanczos3")]
        algorithm: Algorithm,

        /// Worker threads (0 uses the global pool)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Delete staged files older than the retention window
    Cleanup {
        /// Storage directories to sweep
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Retention window in minutes
        #[arg(long, default_value_t = 5)]
        max_age_minutes: u64,
    },

    /// Show image dimensions, format and file size
    Info {
        /// Input image file
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jpeg => OutputFormat::Jpeg,
            Format::Png => OutputFormat::Png,
            Format::Webp => OutputFormat::WebP,
            Format::Gif => OutputFormat::Gif,
            Format::Bmp => OutputFormat::Bmp,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}
