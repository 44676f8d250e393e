//! Time formatting helpers shared by the pages

use chrono::{DateTime, Duration, Utc};

/// Render an age the way `kubectl` does: `45s`, `12m`, `3h`, `2d`, `1y`.
pub fn short_human_duration(d: Duration) -> String {
    let seconds = d.num_seconds();
    if seconds < -1 {
        return "<invalid>".to_string();
    }
    if seconds < 0 {
        return "0s".to_string();
    }
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let minutes = d.num_minutes();
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = d.num_hours();
    if hours < 24 {
        return format!("{}h", hours);
    }
    if hours < 24 * 365 {
        return format!("{}d", hours / 24);
    }
    format!("{}y", hours / 24 / 365)
}

/// Render an elapsed duration truncated to whole seconds: `0s`, `1m30s`, `2h0m5s`.
pub fn format_elapsed(d: Duration) -> String {
    let total = d.num_seconds();
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}{}h{}m{}s", sign, hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}{}m{}s", sign, minutes, seconds)
    } else {
        format!("{}{}s", sign, seconds)
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, empty when the time is unknown.
pub fn format_date_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Short human age of `time` relative to `now`, empty when the time is unknown.
pub fn age_since(time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    time.map(|t| short_human_duration(now - t))
        .unwrap_or_default()
}
