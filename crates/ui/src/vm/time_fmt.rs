use chrono::{DateTime, Utc};

/// "4m 05s" style label for the time between two instants. Negative spans clamp to zero.
#[must_use]
pub fn format_elapsed(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> String {
    let secs = (finished_at - started_at).num_seconds().max(0);
    let minutes = secs / 60;
    let remainder = secs % 60;
    if minutes == 0 {
        format!("{remainder}s")
    } else {
        format!("{minutes}m {remainder:02}s")
    }
}
