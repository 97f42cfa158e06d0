// squish/src/storage/mod.rs
mod cleanup;
mod naming;
mod sweeper;

pub use cleanup::{cleanup_old_files, sweep_older_than};
pub use naming::generate_unique_filename;
pub use sweeper::Sweeper;
