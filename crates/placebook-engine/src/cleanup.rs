//! Background asset cleanup
//!
//! Removing an image is advisory: it runs after the owning transaction has
//! committed, on a dedicated worker thread, and its outcome never reaches
//! the caller. Failures are reported as `warn` events.

use placebook_core::assets::AssetStore;
use placebook_core::errors::{ExError, Result};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

enum Job {
    Remove(String),
    Flush(Sender<()>),
}

/// Handle to the cleanup worker
///
/// Dropping the handle closes the queue, lets the worker drain what was
/// already scheduled, and joins it.
pub struct AssetCleanup {
    sender: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AssetCleanup {
    /// Spawn the worker thread
    pub fn start(store: Arc<dyn AssetStore>) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Job>();

        let worker = std::thread::Builder::new()
            .name("placebook-asset-cleanup".to_string())
            .spawn(move || {
                for job in receiver {
                    match job {
                        Job::Remove(path) => remove_asset(store.as_ref(), &path),
                        Job::Flush(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            })
            .map_err(|e| ExError::operation_failed("asset_cleanup_start", e.to_string()))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn send(&self, job: Job) -> bool {
        match self.sender.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|s| s.send(job).is_ok()),
            Err(_) => false,
        }
    }

    /// Queue `path` for removal; never blocks on I/O and never fails
    pub fn schedule(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        if !self.send(Job::Remove(path.to_string())) {
            tracing::warn!(asset_path = path, "Asset cleanup queue closed, asset left behind");
        }
    }

    /// Block until every job scheduled before this call has been processed
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        if self.send(Job::Flush(ack)) {
            let _ = done.recv();
        }
    }
}

fn remove_asset(store: &dyn AssetStore, path: &str) {
    match store.remove(path) {
        Ok(()) => tracing::debug!(asset_path = path, "Asset removed"),
        Err(err) => tracing::warn!(
            asset_path = path,
            err.code = err.code(),
            error = %err,
            "Asset cleanup failed"
        ),
    }
}

impl Drop for AssetCleanup {
    fn drop(&mut self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        if let Ok(mut worker) = self.worker.lock() {
            if let Some(handle) = worker.take() {
                if handle.join().is_err() {
                    tracing::warn!("Asset cleanup worker panicked");
                }
            }
        }
    }
}
