//! Periodic expiry sweep tied to a controller's lifetime

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::store::DraftStore;

/// Cancellable background task running `cleanup_expired` on an interval.
///
/// Dropping the sweeper signals the worker and joins it, so no timer thread
/// outlives the controller that started it.
pub struct Sweeper {
    stop: mpsc::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweep thread. The first sweep runs one `interval` from now.
    pub fn start<S>(store: Arc<S>, interval: Duration) -> Self
    where
        S: DraftStore + Send + Sync + 'static,
    {
        let (stop, ticks) = mpsc::channel::<()>();
        let worker = std::thread::Builder::new()
            .name("draft-sweeper".to_string())
            .spawn(move || {
                while let Err(RecvTimeoutError::Timeout) = ticks.recv_timeout(interval) {
                    store.cleanup_expired();
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::error!("failed to spawn draft sweeper: {error}");
                None
            }
        };

        Self { stop, worker }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
