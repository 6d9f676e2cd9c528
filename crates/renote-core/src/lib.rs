//! renote-core - Core library for Renote
//!
//! This crate contains the draft model, persistence layer, and lifecycle
//! logic shared by all Renote interfaces (UI embedding, CLI).

pub mod controller;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod store;
pub mod sweep;
pub mod util;

pub use controller::DraftController;
pub use error::{Error, Result};
pub use models::{Draft, DraftConflict, DraftMap, InvoiceRef};
pub use store::{DraftStore, JsonFileStore, MemoryStore};
