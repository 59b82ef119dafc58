//! Text output for topic spans.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use topic_core::TopicSpan;

/// Compact `1h2m3s` form, whole seconds, never negative.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn format_timestamp(start: DateTime<Utc>) -> String {
    start.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `<start>\t<duration>[ (active)]\t<label>`
pub fn format_span(span: &TopicSpan) -> String {
    let marker = if span.open { " (active)" } else { "" };
    format!(
        "{}\t{}{}\t{}",
        format_timestamp(span.entry.start),
        format_duration(span.duration),
        marker,
        span.entry.label
    )
}
