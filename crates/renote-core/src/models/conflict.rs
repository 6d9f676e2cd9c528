//! Conflict descriptor computed when the form is about to load an invoice

use crate::models::draft::{most_recent_first, Draft, DraftMap};

/// Outcome of checking a target invoice against the saved draft set.
///
/// Ephemeral and never persisted. `all` holds every non-expired draft,
/// most recently saved first; for `DifferentInvoice` the surfaced draft is
/// the first of that ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftConflict {
    /// No non-expired drafts exist
    None,
    /// A draft exists for the requested invoice itself
    SameInvoice { draft: Draft, all: Vec<Draft> },
    /// Drafts exist, but none for the requested invoice
    DifferentInvoice { draft: Draft, all: Vec<Draft> },
}

impl DraftConflict {
    /// Classify `target_invoice_id` against the draft set as of `now_ms`.
    #[must_use]
    pub fn classify(drafts: &DraftMap, target_invoice_id: i64, now_ms: i64) -> Self {
        let mut live = drafts.clone();
        live.retain(|_, draft| !draft.is_expired(now_ms));
        if live.is_empty() {
            return Self::None;
        }

        let all = most_recent_first(&live);
        match live.get(&target_invoice_id) {
            Some(draft) => Self::SameInvoice {
                draft: draft.clone(),
                all,
            },
            None => Self::DifferentInvoice {
                draft: all[0].clone(),
                all,
            },
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The draft that triggered the classification, if any.
    #[must_use]
    pub const fn matched_draft(&self) -> Option<&Draft> {
        match self {
            Self::None => None,
            Self::SameInvoice { draft, .. } | Self::DifferentInvoice { draft, .. } => Some(draft),
        }
    }

    /// Every non-expired draft at classification time, most recent first.
    #[must_use]
    pub fn all_drafts(&self) -> &[Draft] {
        match self {
            Self::None => &[],
            Self::SameInvoice { all, .. } | Self::DifferentInvoice { all, .. } => all,
        }
    }
}
