use renote_core::format::status_message;
use renote_core::util::unix_millis_now;
use renote_core::{DraftStore, JsonFileStore};

use crate::commands::common::invoice_label;
use crate::error::CliError;

pub fn run_show(invoice_id: i64, as_json: bool, store: &JsonFileStore) -> Result<(), CliError> {
    let drafts = store.cleanup_expired();
    let draft = drafts
        .get(&invoice_id)
        .ok_or(CliError::DraftNotFound(invoice_id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(draft)?);
    } else {
        println!("Invoice:  {}", invoice_label(draft));
        if !draft.customer_name.is_empty() {
            println!("Customer: {}", draft.customer_name);
        }
        println!("{}", status_message(draft, unix_millis_now()));
        println!();
        println!("{:#}", draft.data);
    }

    Ok(())
}
