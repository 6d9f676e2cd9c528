//! Shared draft export helpers for CLI and UI parity.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Draft;

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable draft representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDraft {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub timestamp: i64,
    pub expires_at: i64,
    pub data: Value,
}

/// Convert a draft into an export record.
#[must_use]
pub fn draft_to_export_item(draft: &Draft) -> ExportDraft {
    ExportDraft {
        invoice_id: draft.invoice_id,
        invoice_number: draft.invoice_number.clone(),
        customer_name: draft.customer_name.clone(),
        timestamp: draft.timestamp,
        expires_at: draft.expires_at,
        data: draft.data.clone(),
    }
}

/// Render drafts as pretty-printed JSON.
pub fn render_json_export(drafts: &[Draft]) -> serde_json::Result<String> {
    let items = drafts
        .iter()
        .map(draft_to_export_item)
        .collect::<Vec<ExportDraft>>();
    serde_json::to_string_pretty(&items)
}

/// Render drafts in Markdown with frontmatter blocks; the body is the
/// pretty-printed form payload.
#[must_use]
pub fn render_markdown_export(drafts: &[Draft]) -> String {
    let mut output = String::new();

    for (index, draft) in drafts.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let item = draft_to_export_item(draft);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "invoice_id: {}", item.invoice_id);
        let _ = writeln!(output, "invoice_number: {}", item.invoice_number);
        let _ = writeln!(output, "customer_name: {}", item.customer_name);
        let _ = writeln!(output, "timestamp: {}", item.timestamp);
        let _ = writeln!(output, "expires_at: {}", item.expires_at);
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "{:#}", item.data);
    }

    output
}

/// Render drafts based on selected export format.
pub fn render_drafts_export(drafts: &[Draft], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(drafts),
        ExportFormat::Markdown => Ok(render_markdown_export(drafts)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("renote-export-{timestamp_ms}.{}", format.extension())
}
