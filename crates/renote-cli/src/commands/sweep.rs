use renote_core::{DraftStore, JsonFileStore};

use crate::error::CliError;

pub fn run_sweep(store: &JsonFileStore) -> Result<(), CliError> {
    let before = store.load_all().len();
    let remaining = store.cleanup_expired().len();

    println!("Removed {} expired draft(s)", before - remaining);
    Ok(())
}
