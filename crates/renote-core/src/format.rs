//! Display formatting for draft timestamps and status lines

use chrono::{Local, NaiveDate, TimeZone};

use crate::models::Draft;

/// Format how long ago a snapshot was written.
///
/// `"just now"` under 10 seconds, then seconds/minutes/hours, then the
/// local date once a day has passed.
#[must_use]
pub fn relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms) / 1_000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if seconds < 10 {
        "just now".to_string()
    } else if seconds < 60 {
        format!("{seconds}s ago")
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        local_date(timestamp_ms)
    }
}

/// Format the time remaining until a draft expires.
#[must_use]
pub fn time_until_expiry(expires_at_ms: i64, now_ms: i64) -> String {
    let remaining = expires_at_ms - now_ms;
    if remaining <= 0 {
        return "expired".to_string();
    }

    let hours = remaining / 3_600_000;
    let minutes = (remaining % 3_600_000) / 60_000;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// One-line draft status for list display.
///
/// `"Saved 2h ago • Expires tonight at midnight"` while the expiry falls on
/// today's local calendar date, otherwise the expiry date is spelled out.
#[must_use]
pub fn status_message(draft: &Draft, now_ms: i64) -> String {
    let saved = relative_time(draft.timestamp, now_ms);
    let expires_today = matches!(
        (local_calendar_date(draft.expires_at), local_calendar_date(now_ms)),
        (Some(expiry), Some(today)) if expiry == today
    );

    if expires_today {
        format!("Saved {saved} • Expires tonight at midnight")
    } else {
        format!("Saved {saved} • Expires {}", local_date(draft.expires_at))
    }
}

fn local_calendar_date(timestamp_ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|instant| instant.date_naive())
}

fn local_date(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map_or_else(String::new, |instant| {
            instant.format("%Y-%m-%d").to_string()
        })
}
