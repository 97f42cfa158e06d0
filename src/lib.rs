mod core;
mod processors;
mod storage;
mod utils;

pub use crate::core::pipeline::Pipeline;
pub use crate::core::{
    reduction_percent, CompressionConfig, CompressionError, CompressionResult, OutputFormat,
    ResizeAlgorithm, Result,
};
pub use crate::processors::{
    normalize_colors, plan_bounded_fit, BatchCompressor, BatchSummary, Encoder, Loader, Resizer,
};
pub use crate::storage::{cleanup_old_files, generate_unique_filename, sweep_older_than, Sweeper};
pub use crate::utils::{format_file_size, is_allowed_extension, ALLOWED_EXTENSIONS};

pub mod prelude {
    pub use crate::{
        BatchCompressor, CompressionConfig, CompressionResult, OutputFormat, Pipeline, Sweeper,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
