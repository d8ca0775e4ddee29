//! Human-readable display formatting for durations and byte sizes

use bytesize::ByteSize;
use std::time::Duration;

/// Format milliseconds as a human-readable duration, e.g. `1s 250ms`.
///
/// Sub-millisecond precision is rounded away.
pub fn format_duration(ms: f64) -> String {
    let ms = if ms.is_finite() && ms > 0.0 {
        ms.round() as u64
    } else {
        0
    };
    humantime::format_duration(Duration::from_millis(ms)).to_string()
}

/// Format a byte count as a human-readable size, e.g. `1.5 KB`
pub fn format_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes.round() as u64
    } else {
        0
    };
    ByteSize::b(bytes).to_string()
}
