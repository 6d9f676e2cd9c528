//! Draft persistence layer for Renote

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::DraftMap;
use crate::util::unix_millis_now;

/// Trait for draft collection storage.
///
/// The backing medium holds the whole collection as one document that is
/// read-modify-written wholesale; there are no partial updates. Failure
/// semantics follow the degrade-gracefully policy: reads fall back to an
/// empty collection, writes report `false`, and neither ever panics or
/// returns an error to the caller.
pub trait DraftStore {
    /// Read the full collection; empty on missing or unreadable storage.
    fn load_all(&self) -> DraftMap;

    /// Replace the full collection; `false` (after logging) on any failure.
    fn save_all(&self, drafts: &DraftMap) -> bool;

    /// Remove the whole collection; `false` (after logging) on failure.
    fn clear(&self) -> bool;

    /// Drop every expired entry and persist the survivors if anything
    /// changed. The single choke point for expiry enforcement; no other
    /// code path decides expiry against the persisted collection.
    fn cleanup_expired(&self) -> DraftMap {
        let now_ms = unix_millis_now();
        let mut drafts = self.load_all();
        let before = drafts.len();
        drafts.retain(|_, draft| !draft.is_expired(now_ms));

        if drafts.len() < before {
            tracing::debug!("swept {} expired draft(s)", before - drafts.len());
            self.save_all(&drafts);
        }

        drafts
    }
}
