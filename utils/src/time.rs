//! Time formatting helpers.

use jury_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m {}s", secs / 60, secs % 60),
        3_600..=86_399 => format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60),
        _ => format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3_600),
    }
}

/// Describe how far `deadline` lies from `now`, e.g. `"in 6d 23h"` or `"passed"`.
pub fn format_until(deadline: Timestamp, now: Timestamp) -> String {
    if now >= deadline {
        "passed".to_string()
    } else {
        format!("in {}", format_duration(now.elapsed_since(deadline)))
    }
}
