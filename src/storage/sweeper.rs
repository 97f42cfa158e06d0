// squish/src/storage/sweeper.rs
use super::cleanup_old_files;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

// Recurring background sweep over a set of storage directories. The thread is
// owned: `stop` (or dropping the Sweeper) signals it and joins before
// returning, so no unmanaged loop outlives its owner.
pub struct Sweeper {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Sweeper {
    pub fn start(directories: Vec<PathBuf>, interval: Duration, max_age: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    let removed: usize = directories
                        .iter()
                        .map(|dir| cleanup_old_files(dir, max_age))
                        .sum();
                    if removed > 0 {
                        log::info!("scheduled sweep removed {} expired files", removed);
                    }
                }
                // Stop signal, or the Sweeper was leaked and the sender dropped.
                _ => break,
            }
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_tx.send(());
            let _ = handle.join();
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
