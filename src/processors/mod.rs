// squish/src/processors/mod.rs
mod batch;
mod encoder;
mod loader;
mod resizer;

pub use batch::{BatchCompressor, BatchSummary};
pub use encoder::{normalize_colors, Encoder};
pub use loader::Loader;
pub use resizer::{plan_bounded_fit, Resizer};
