//! Draft lifecycle controller
//!
//! Stateful wrapper over a [`DraftStore`] that the form layer talks to:
//! keeps an in-memory mirror of the collection, resolves the draft for the
//! invoice currently being edited, classifies conflicts when a new invoice
//! is requested, stages a pending payload for silent exit capture, and runs
//! a periodic expiry sweep for as long as it lives.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::models::{most_recent_first, Draft, DraftConflict, DraftMap, InvoiceRef};
use crate::store::DraftStore;
use crate::sweep::Sweeper;
use crate::util::unix_millis_now;

/// Interval between background expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Payload staged for capture at exit time. Not a draft itself; nothing is
/// written until an exit trigger fires.
struct PendingSave {
    data: Value,
    invoice: InvoiceRef,
}

/// Stateful controller for the credit-note draft lifecycle.
///
/// Construction loads the freshly pruned collection and resolves the draft
/// for `current_invoice_id` without firing the conflict callback; conflict
/// detection is driven by later [`set_current_invoice`] changes. Teardown
/// (drop) captures any staged pending payload and cancels the sweep.
///
/// [`set_current_invoice`]: DraftController::set_current_invoice
pub struct DraftController<S: DraftStore> {
    store: Arc<S>,
    current_invoice_id: Option<i64>,
    drafts: DraftMap,
    current_draft: Option<Draft>,
    conflict: Option<DraftConflict>,
    pending_save: Option<PendingSave>,
    on_conflict: Option<Box<dyn FnMut(&DraftConflict)>>,
    sweeper: Option<Sweeper>,
}

impl<S> DraftController<S>
where
    S: DraftStore + Send + Sync + 'static,
{
    /// Create a controller with the default hourly expiry sweep.
    #[must_use]
    pub fn new(store: Arc<S>, current_invoice_id: Option<i64>) -> Self {
        Self::with_sweep_interval(store, current_invoice_id, Some(DEFAULT_SWEEP_INTERVAL))
    }

    /// Create a controller with an explicit sweep interval, or none.
    #[must_use]
    pub fn with_sweep_interval(
        store: Arc<S>,
        current_invoice_id: Option<i64>,
        sweep_interval: Option<Duration>,
    ) -> Self {
        let mut controller = Self::init(store, current_invoice_id);
        if let Some(interval) = sweep_interval {
            controller.sweeper = Some(Sweeper::start(Arc::clone(&controller.store), interval));
        }
        controller
    }
}

impl<S: DraftStore> DraftController<S> {
    fn init(store: Arc<S>, current_invoice_id: Option<i64>) -> Self {
        let drafts = store.cleanup_expired();
        let current_draft = current_invoice_id.and_then(|id| drafts.get(&id).cloned());

        Self {
            store,
            current_invoice_id,
            drafts,
            current_draft,
            conflict: None,
            pending_save: None,
            on_conflict: None,
            sweeper: None,
        }
    }

    /// Register the callback invoked when an invoice change hits a conflict.
    pub fn set_on_conflict(&mut self, on_conflict: impl FnMut(&DraftConflict) + 'static) {
        self.on_conflict = Some(Box::new(on_conflict));
    }

    /// Point the controller at a new target invoice.
    ///
    /// No-op when the id is unchanged. Otherwise the in-memory state is
    /// refreshed from the pruned collection and, when the new id is set,
    /// the conflict classification runs; a non-`None` result is stored and
    /// the callback fires exactly once for this change.
    pub fn set_current_invoice(&mut self, invoice_id: Option<i64>) {
        if invoice_id == self.current_invoice_id {
            return;
        }

        self.current_invoice_id = invoice_id;
        self.drafts = self.store.cleanup_expired();
        self.current_draft = invoice_id.and_then(|id| self.drafts.get(&id).cloned());

        if let Some(target) = invoice_id {
            let conflict = DraftConflict::classify(&self.drafts, target, unix_millis_now());
            if !conflict.is_none() {
                self.conflict = Some(conflict.clone());
                if let Some(on_conflict) = self.on_conflict.as_mut() {
                    on_conflict(&conflict);
                }
            }
        }
    }

    /// Persist a snapshot for the resolved invoice.
    ///
    /// The id resolves from `invoice`, else from the configured current
    /// invoice; without one the save is refused. `false` also covers a
    /// failed store write, in which case in-memory state is untouched.
    pub fn save_draft(&mut self, data: Value, invoice: &InvoiceRef) -> bool {
        let Some(invoice_id) = invoice.invoice_id.or(self.current_invoice_id) else {
            tracing::warn!("cannot save draft without an invoice id");
            return false;
        };

        let draft = Draft::new(invoice_id, data, invoice);
        let mut all = self.store.load_all();
        all.insert(invoice_id, draft.clone());

        if !self.store.save_all(&all) {
            return false;
        }

        self.drafts = all;
        if self.current_invoice_id == Some(invoice_id) {
            self.current_draft = Some(draft);
        }
        true
    }

    /// The non-expired draft for an invoice, if any. Pure read against
    /// in-memory state; never touches the store.
    #[must_use]
    pub fn get_draft(&self, invoice_id: i64) -> Option<&Draft> {
        let now_ms = unix_millis_now();
        self.drafts
            .get(&invoice_id)
            .filter(|draft| !draft.is_expired(now_ms))
    }

    /// Remove the draft for an invoice from store and state.
    ///
    /// Clears `current_draft` when it was the deleted entry. Absent ids are
    /// a no-op returning `false`.
    pub fn delete_draft(&mut self, invoice_id: i64) -> bool {
        let mut all = self.store.load_all();
        if all.remove(&invoice_id).is_none() {
            return false;
        }

        self.store.save_all(&all);
        self.drafts = all;
        if self
            .current_draft
            .as_ref()
            .is_some_and(|draft| draft.invoice_id == invoice_id)
        {
            self.current_draft = None;
        }
        true
    }

    /// Wipe the persisted collection and reset in-memory state.
    pub fn clear_all_drafts(&mut self) {
        self.store.clear();
        self.drafts.clear();
        self.current_draft = None;
    }

    #[must_use]
    pub fn has_draft_for_invoice(&self, invoice_id: i64) -> bool {
        self.get_draft(invoice_id).is_some()
    }

    /// Classify a target invoice against the freshly pruned draft set.
    ///
    /// Side-effect free apart from the store pruning `cleanup_expired`
    /// performs; neither `current_draft` nor the stored conflict change.
    #[must_use]
    pub fn check_conflict(&self, target_invoice_id: i64) -> DraftConflict {
        let pruned = self.store.cleanup_expired();
        DraftConflict::classify(&pruned, target_invoice_id, unix_millis_now())
    }

    /// Stage the payload to capture silently at exit time.
    pub fn set_pending_save(&mut self, data: Value, invoice: InvoiceRef) {
        self.pending_save = Some(PendingSave { data, invoice });
    }

    /// Drop any staged payload (e.g. after an explicit save).
    pub fn clear_pending_save(&mut self) {
        self.pending_save = None;
    }

    /// Reload the pruned collection into in-memory state, e.g. after an
    /// external mutation of the medium.
    pub fn refresh_drafts(&mut self) -> &DraftMap {
        self.drafts = self.store.cleanup_expired();
        &self.drafts
    }

    /// The host's unload/close trigger: capture the staged payload now.
    ///
    /// Shares one routine with teardown capture. Silent by contract; a
    /// failed write is logged and swallowed.
    pub fn handle_exit_signal(&self) {
        self.capture_pending();
    }

    // -- read-only state -----------------------------------------------------

    #[must_use]
    pub fn drafts(&self) -> &DraftMap {
        &self.drafts
    }

    #[must_use]
    pub fn current_draft(&self) -> Option<&Draft> {
        self.current_draft.as_ref()
    }

    #[must_use]
    pub const fn current_invoice_id(&self) -> Option<i64> {
        self.current_invoice_id
    }

    /// The last non-`None` conflict computed by an invoice change.
    #[must_use]
    pub fn conflict_info(&self) -> Option<&DraftConflict> {
        self.conflict.as_ref()
    }

    /// All non-expired drafts, most recently saved first.
    #[must_use]
    pub fn all_drafts(&self) -> Vec<Draft> {
        let now_ms = unix_millis_now();
        let mut live = self.drafts.clone();
        live.retain(|_, draft| !draft.is_expired(now_ms));
        most_recent_first(&live)
    }

    #[must_use]
    pub fn has_drafts(&self) -> bool {
        let now_ms = unix_millis_now();
        self.drafts.values().any(|draft| !draft.is_expired(now_ms))
    }

    fn capture_pending(&self) {
        let Some(pending) = self.pending_save.as_ref() else {
            return;
        };
        let Some(invoice_id) = pending.invoice.invoice_id.or(self.current_invoice_id) else {
            tracing::warn!("skipping exit capture: no resolvable invoice id");
            return;
        };
        if pending.data.is_null() {
            return;
        }

        let draft = Draft::new(invoice_id, pending.data.clone(), &pending.invoice);
        let mut all = self.store.load_all();
        all.insert(invoice_id, draft);
        if !self.store.save_all(&all) {
            tracing::error!("failed to persist draft for invoice {invoice_id} on exit");
        }
    }
}

impl<S: DraftStore> Drop for DraftController<S> {
    fn drop(&mut self) {
        self.capture_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller(
        store: &Arc<MemoryStore>,
        current_invoice_id: Option<i64>,
    ) -> DraftController<MemoryStore> {
        DraftController::with_sweep_interval(Arc::clone(store), current_invoice_id, None)
    }

    fn seed(store: &MemoryStore, invoice_id: i64, timestamp: i64, expires_at: i64) {
        let mut all = store.load_all();
        let mut draft = Draft::new(invoice_id, json!({}), &InvoiceRef::with_id(invoice_id));
        draft.timestamp = timestamp;
        draft.expires_at = expires_at;
        all.insert(invoice_id, draft);
        assert!(store.save_all(&all));
    }

    #[test]
    fn starts_empty() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller(&store, None);

        assert!(controller.drafts().is_empty());
        assert!(controller.current_draft().is_none());
        assert!(controller.conflict_info().is_none());
        assert!(!controller.has_drafts());
    }

    #[test]
    fn save_and_resume_across_reload() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut first = controller(&store, Some(42));
            assert!(first.save_draft(json!({"amount": 500}), &InvoiceRef::with_id(42)));
        }

        // A fresh controller over the same medium simulates a page reload.
        let second = controller(&store, Some(42));
        let resumed = second.get_draft(42).expect("draft survives reload");
        assert_eq!(resumed.data["amount"], json!(500));
        assert_eq!(second.current_draft().unwrap().invoice_id, 42);
    }

    #[test]
    fn save_without_invoice_id_fails() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, None);

        assert!(!controller.save_draft(json!({"amount": 1}), &InvoiceRef::default()));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn save_resolves_id_from_current_invoice() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(7));

        assert!(controller.save_draft(json!({"amount": 9}), &InvoiceRef::default()));
        assert!(controller.has_draft_for_invoice(7));
        assert_eq!(controller.current_draft().unwrap().invoice_id, 7);
    }

    #[test]
    fn save_for_other_invoice_leaves_current_draft_alone() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(7));

        assert!(controller.save_draft(json!({"amount": 9}), &InvoiceRef::with_id(9)));
        assert!(controller.has_draft_for_invoice(9));
        assert!(controller.current_draft().is_none());
    }

    #[test]
    fn overwrite_keeps_one_entry_with_latest_data() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(42));

        assert!(controller.save_draft(json!({"amount": 100}), &InvoiceRef::with_id(42)));
        assert!(controller.save_draft(json!({"amount": 250}), &InvoiceRef::with_id(42)));

        assert_eq!(store.load_all().len(), 1);
        assert_eq!(controller.get_draft(42).unwrap().data["amount"], json!(250));
    }

    #[test]
    fn save_failure_reports_false_and_keeps_state() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(42));

        store.set_read_only(true);
        assert!(!controller.save_draft(json!({"amount": 1}), &InvoiceRef::with_id(42)));
        assert!(!controller.has_draft_for_invoice(42));
        assert!(controller.current_draft().is_none());
    }

    #[test]
    fn expired_drafts_are_invisible() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 1, 500, unix_millis_now() - 1_000);
        seed(&store, 2, 600, unix_millis_now() + 60_000);

        let controller = controller(&store, Some(1));
        assert!(controller.get_draft(1).is_none());
        assert!(!controller.has_draft_for_invoice(1));
        assert!(controller.current_draft().is_none());
        assert_eq!(controller.all_drafts().len(), 1);

        // Initialization lazily removed the expired entry from the medium.
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn delete_draft_clears_current_and_conflict() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(5));
        assert!(controller.save_draft(json!({"amount": 3}), &InvoiceRef::with_id(5)));

        assert!(controller.delete_draft(5));
        assert!(controller.current_draft().is_none());
        assert!(controller.check_conflict(5).is_none());
        assert!(store.load_all().is_empty());

        // Deleting again is a no-op, not an error.
        assert!(!controller.delete_draft(5));
    }

    #[test]
    fn clear_all_drafts_resets_everything() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(5));
        assert!(controller.save_draft(json!({}), &InvoiceRef::with_id(5)));
        assert!(controller.save_draft(json!({}), &InvoiceRef::with_id(6)));

        controller.clear_all_drafts();
        assert!(controller.drafts().is_empty());
        assert!(controller.current_draft().is_none());
        assert!(!controller.has_drafts());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn conflict_classification_matches_target() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, None);
        assert!(controller.save_draft(json!({}), &InvoiceRef::with_id(20)));

        assert!(matches!(
            controller.check_conflict(20),
            DraftConflict::SameInvoice { .. }
        ));
        assert!(matches!(
            controller.check_conflict(99),
            DraftConflict::DifferentInvoice { .. }
        ));

        assert!(controller.delete_draft(20));
        assert!(controller.check_conflict(20).is_none());
    }

    #[test]
    fn different_invoice_surfaces_most_recent_draft() {
        let store = Arc::new(MemoryStore::new());
        let now_ms = unix_millis_now();
        seed(&store, 10, now_ms - 5_000, now_ms + 60_000);
        seed(&store, 11, now_ms - 1_000, now_ms + 60_000);

        let controller = controller(&store, None);
        let conflict = controller.check_conflict(99);
        assert_eq!(conflict.matched_draft().unwrap().invoice_id, 11);
        assert_eq!(conflict.all_drafts().len(), 2);
    }

    #[test]
    fn init_does_not_fire_conflict_state() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 20, 500, unix_millis_now() + 60_000);

        let controller = controller(&store, Some(20));
        assert!(controller.conflict_info().is_none());
        assert_eq!(controller.current_draft().unwrap().invoice_id, 20);
    }

    #[test]
    fn invoice_change_fires_callback_once() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 20, 500, unix_millis_now() + 60_000);

        let mut controller = controller(&store, None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.set_on_conflict(move |conflict| sink.borrow_mut().push(conflict.clone()));

        controller.set_current_invoice(Some(99));
        assert_eq!(seen.borrow().len(), 1);
        assert!(matches!(
            seen.borrow()[0],
            DraftConflict::DifferentInvoice { .. }
        ));
        assert!(controller.conflict_info().is_some());

        // Re-setting the same target is not a change.
        controller.set_current_invoice(Some(99));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn invoice_change_repoints_current_draft() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 20, 500, unix_millis_now() + 60_000);

        let mut controller = controller(&store, None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.set_on_conflict(move |conflict| sink.borrow_mut().push(conflict.clone()));

        controller.set_current_invoice(Some(20));
        assert_eq!(controller.current_draft().unwrap().invoice_id, 20);
        assert!(matches!(seen.borrow()[0], DraftConflict::SameInvoice { .. }));

        controller.set_current_invoice(None);
        assert!(controller.current_draft().is_none());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn pending_save_is_not_written_until_exit() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(7));

        controller.set_pending_save(json!({"amount": 77}), InvoiceRef::default());
        assert!(store.load_all().is_empty());

        controller.handle_exit_signal();
        let captured = store.load_all();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[&7].data["amount"], json!(77));
    }

    #[test]
    fn exit_capture_prefers_payload_invoice_id() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, Some(7));

        controller.set_pending_save(json!({"amount": 1}), InvoiceRef::with_id(8));
        controller.handle_exit_signal();

        assert!(store.load_all().contains_key(&8));
    }

    #[test]
    fn teardown_captures_pending() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut controller = controller(&store, Some(7));
            controller.set_pending_save(json!({"amount": 50}), InvoiceRef::default());
        }

        let captured = store.load_all();
        assert_eq!(captured[&7].data["amount"], json!(50));
    }

    #[test]
    fn cleared_pending_is_not_captured() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut controller = controller(&store, Some(7));
            controller.set_pending_save(json!({"amount": 50}), InvoiceRef::default());
            controller.clear_pending_save();
        }

        assert!(store.load_all().is_empty());
    }

    #[test]
    fn unresolvable_or_null_pending_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut without_id = controller(&store, None);
            without_id.set_pending_save(json!({"amount": 50}), InvoiceRef::default());
        }
        {
            let mut null_payload = controller(&store, Some(7));
            null_payload.set_pending_save(Value::Null, InvoiceRef::default());
        }

        assert!(store.load_all().is_empty());
    }

    #[test]
    fn refresh_drafts_resyncs_after_external_mutation() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(&store, None);
        assert!(controller.drafts().is_empty());

        seed(&store, 12, 500, unix_millis_now() + 60_000);
        assert!(controller.refresh_drafts().contains_key(&12));
        assert!(controller.has_drafts());
    }

    #[test]
    fn periodic_sweep_prunes_the_medium() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 2, 600, unix_millis_now() + 60_000);
        let controller = DraftController::with_sweep_interval(
            Arc::clone(&store),
            None,
            Some(Duration::from_millis(5)),
        );

        seed(&store, 1, 500, unix_millis_now() - 1_000);
        std::thread::sleep(Duration::from_millis(100));

        let remaining = store.load_all();
        assert_eq!(remaining.keys().copied().collect::<Vec<i64>>(), vec![2]);
        drop(controller);
    }
}
