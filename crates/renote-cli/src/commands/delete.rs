use renote_core::{DraftStore, JsonFileStore};

use crate::error::CliError;

pub fn run_delete(invoice_id: i64, store: &JsonFileStore) -> Result<(), CliError> {
    let mut drafts = store.load_all();
    if drafts.remove(&invoice_id).is_none() {
        return Err(CliError::DraftNotFound(invoice_id));
    }

    if !store.save_all(&drafts) {
        return Err(CliError::PersistFailed);
    }

    println!("{invoice_id}");
    Ok(())
}
