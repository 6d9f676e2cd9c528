use renote_core::models::most_recent_first;
use renote_core::util::unix_millis_now;
use renote_core::{DraftStore, JsonFileStore};

use crate::commands::common::{draft_to_list_item, format_draft_lines, DraftListItem};
use crate::error::CliError;

pub fn run_list(as_json: bool, store: &JsonFileStore) -> Result<(), CliError> {
    let drafts = most_recent_first(&store.cleanup_expired());
    let now_ms = unix_millis_now();

    if as_json {
        let items = drafts
            .iter()
            .map(|draft| draft_to_list_item(draft, now_ms))
            .collect::<Vec<DraftListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if drafts.is_empty() {
        println!("No saved drafts");
    } else {
        for line in format_draft_lines(&drafts, now_ms) {
            println!("{line}");
        }
    }

    Ok(())
}
