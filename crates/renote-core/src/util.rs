//! Shared utility functions used across multiple modules.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// End of the local calendar day `now` falls in (23:59:59.999), in Unix
/// milliseconds. Drafts saved at any point during a day all expire here.
pub fn end_of_day_millis(now: DateTime<Local>) -> i64 {
    let end = now
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid wall clock time");
    // Ambiguous local times (DST fold) resolve to the later instant.
    Local
        .from_local_datetime(&end)
        .latest()
        .map_or_else(|| now.timestamp_millis(), |end| end.timestamp_millis())
}
