use renote_core::{DraftStore, JsonFileStore};

use crate::error::CliError;

pub fn run_clear(store: &JsonFileStore) -> Result<(), CliError> {
    let count = store.load_all().len();
    if !store.clear() {
        return Err(CliError::PersistFailed);
    }

    println!("Removed {count} draft(s)");
    Ok(())
}
