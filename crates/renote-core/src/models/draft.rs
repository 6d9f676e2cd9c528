//! Draft model

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::{end_of_day_millis, normalize_text_option};

/// The persisted draft collection, keyed by source invoice id.
///
/// `serde_json` writes the integer keys as decimal strings, which pins the
/// on-disk layout to `{"<invoiceId>": {...}}`.
pub type DraftMap = BTreeMap<i64, Draft>;

/// A snapshot of one in-progress credit-note form.
///
/// Every field defaults individually so a structurally partial entry
/// deserializes instead of discarding the whole collection; a defaulted
/// `expires_at` of `0` is simply an already-expired draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Opaque form-state payload, exactly as the form last held it
    #[serde(default)]
    pub data: Value,
    /// Source invoice id (the collection key)
    #[serde(default)]
    pub invoice_id: i64,
    /// Denormalized invoice number, display only
    #[serde(default)]
    pub invoice_number: String,
    /// Denormalized customer name, display only
    #[serde(default)]
    pub customer_name: String,
    /// When this snapshot was written (Unix ms)
    #[serde(default)]
    pub timestamp: i64,
    /// End of the local calendar day `timestamp` falls in (Unix ms)
    #[serde(default)]
    pub expires_at: i64,
}

/// Caller-supplied invoice context for a save.
///
/// The invoice id resolves from here first, then from the controller's
/// configured current invoice. Display fields fall back to the
/// `invoiceNumber` / `customerName` fields of the opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceRef {
    pub invoice_id: Option<i64>,
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
}

impl InvoiceRef {
    /// Reference an invoice by id alone.
    #[must_use]
    pub const fn with_id(invoice_id: i64) -> Self {
        Self {
            invoice_id: Some(invoice_id),
            invoice_number: None,
            customer_name: None,
        }
    }
}

impl Draft {
    /// Build a fresh snapshot stamped with the current time and expiring at
    /// the end of today.
    #[must_use]
    pub fn new(invoice_id: i64, data: Value, invoice: &InvoiceRef) -> Self {
        let now = Local::now();
        let invoice_number = normalize_text_option(invoice.invoice_number.clone())
            .or_else(|| string_field(&data, "invoiceNumber"))
            .unwrap_or_default();
        let customer_name = normalize_text_option(invoice.customer_name.clone())
            .or_else(|| string_field(&data, "customerName"))
            .unwrap_or_default();

        Self {
            data,
            invoice_id,
            invoice_number,
            customer_name,
            timestamp: now.timestamp_millis(),
            expires_at: end_of_day_millis(now),
        }
    }

    /// Whether this draft is past its end-of-day cutoff.
    #[must_use]
    pub const fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    /// Ordering used wherever "the first draft" must be deterministic:
    /// most recently saved first, invoice id as the tie-break.
    #[must_use]
    pub fn recency_order(a: &Self, b: &Self) -> Ordering {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.invoice_id.cmp(&b.invoice_id))
    }
}

/// Snapshot a draft map as an owned list, most recently saved first.
#[must_use]
pub fn most_recent_first(drafts: &DraftMap) -> Vec<Draft> {
    let mut ordered = drafts.values().cloned().collect::<Vec<Draft>>();
    ordered.sort_by(Draft::recency_order);
    ordered
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    normalize_text_option(data.get(key).and_then(Value::as_str).map(str::to_string))
}
