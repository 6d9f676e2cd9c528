//! Data models for Renote

mod conflict;
mod draft;

pub use conflict::DraftConflict;
pub use draft::{most_recent_first, Draft, DraftMap, InvoiceRef};
