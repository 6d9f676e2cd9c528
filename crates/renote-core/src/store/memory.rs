//! In-memory draft store for tests and embedding

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::DraftMap;
use crate::store::DraftStore;

/// Draft store backed by process memory.
///
/// Substitutable for [`JsonFileStore`](crate::store::JsonFileStore) wherever
/// a controller is exercised without real storage. `set_read_only` simulates
/// a full or unavailable medium so degradation paths can be tested.
#[derive(Debug, Default)]
pub struct MemoryStore {
    drafts: Mutex<DraftMap>,
    read_only: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `save_all` and `clear` report failure without mutating.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }
}

impl DraftStore for MemoryStore {
    fn load_all(&self) -> DraftMap {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save_all(&self, drafts: &DraftMap) -> bool {
        if self.read_only.load(Ordering::Relaxed) {
            tracing::error!("failed to persist drafts: store is read-only");
            return false;
        }

        *self.drafts.lock().unwrap_or_else(PoisonError::into_inner) = drafts.clone();
        true
    }

    fn clear(&self) -> bool {
        if self.read_only.load(Ordering::Relaxed) {
            tracing::error!("failed to clear draft store: store is read-only");
            return false;
        }

        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        true
    }
}
