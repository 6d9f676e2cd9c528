use renote_core::format::{relative_time, time_until_expiry};
use renote_core::Draft;
use serde::Serialize;

/// Serializable list row for `--json` output.
#[derive(Debug, Serialize)]
pub struct DraftListItem {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub timestamp: i64,
    pub expires_at: i64,
    pub saved: String,
    pub expires_in: String,
}

pub fn draft_to_list_item(draft: &Draft, now_ms: i64) -> DraftListItem {
    DraftListItem {
        invoice_id: draft.invoice_id,
        invoice_number: draft.invoice_number.clone(),
        customer_name: draft.customer_name.clone(),
        timestamp: draft.timestamp,
        expires_at: draft.expires_at,
        saved: relative_time(draft.timestamp, now_ms),
        expires_in: time_until_expiry(draft.expires_at, now_ms),
    }
}

pub fn format_draft_lines(drafts: &[Draft], now_ms: i64) -> Vec<String> {
    drafts
        .iter()
        .map(|draft| {
            let invoice = invoice_label(draft);
            let customer = clip(&draft.customer_name, 24);
            let saved = relative_time(draft.timestamp, now_ms);
            let expires_in = time_until_expiry(draft.expires_at, now_ms);

            format!("{invoice:<14}  {customer:<24}  {saved:<12}  expires in {expires_in}")
        })
        .collect()
}

/// Invoice number when the draft carries one, `#<id>` otherwise.
pub fn invoice_label(draft: &Draft) -> String {
    if draft.invoice_number.is_empty() {
        format!("#{}", draft.invoice_id)
    } else {
        clip(&draft.invoice_number, 14)
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
