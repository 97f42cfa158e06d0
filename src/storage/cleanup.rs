// squish/src/storage/cleanup.rs
use crate::core::CompressionError;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

// Best-effort expiry sweep. Deletes regular files directly inside `directory`
// (no recursion) whose modification time is older than `max_age`, and returns
// how many were removed. Failures are logged and skipped; this must never
// fail its caller.
pub fn cleanup_old_files(directory: &Path, max_age: Duration) -> usize {
    sweep_older_than(directory, max_age, SystemTime::now())
}

// The clock is a parameter so tests can age files synthetically instead of
// sleeping through the retention window.
pub fn sweep_older_than(directory: &Path, max_age: Duration, now: SystemTime) -> usize {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "cannot list {}: {}",
                directory.display(),
                CompressionError::CleanupIo(e)
            );
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        match remove_if_expired(&entry, max_age, now) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => log::warn!("skipping {}: {}", entry.path().display(), e),
        }
    }

    if removed > 0 {
        log::info!("removed {} expired files from {}", removed, directory.display());
    }

    removed
}

fn remove_if_expired(
    entry: &fs::DirEntry,
    max_age: Duration,
    now: SystemTime,
) -> Result<bool, CompressionError> {
    let metadata = entry.metadata().map_err(CompressionError::CleanupIo)?;
    if !metadata.is_file() {
        return Ok(false);
    }

    let modified = metadata.modified().map_err(CompressionError::CleanupIo)?;
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    if age <= max_age {
        return Ok(false);
    }

    match fs::remove_file(entry.path()) {
        Ok(()) => Ok(true),
        // A concurrent sweep got there first; deleting an already-deleted
        // file is a no-op.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CompressionError::CleanupIo(e)),
    }
}
