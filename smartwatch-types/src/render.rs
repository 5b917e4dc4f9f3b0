//! Human-readable rendering of attribute values.
//!
//! Every renderer is total: any `i64` produces a string, nothing panics.

use alloc::format;
use alloc::string::{String, ToString};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Binary (IEC) unit suffixes, smallest first.
const BYTE_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Rendering rule attached to each registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    /// Plain integer.
    Plain,
    /// A number of hours, shown as a timespan.
    Hours,
    /// A percentage value.
    Percent,
    /// A byte count in binary units.
    Bytes,
}

impl Renderer {
    /// Render a value.
    pub fn render(self, value: i64) -> String {
        match self {
            Renderer::Plain => value.to_string(),
            Renderer::Hours => render_timespan(i128::from(value) * SECONDS_PER_HOUR as i128),
            Renderer::Percent => render_percent(value),
            Renderer::Bytes => render_bytes(value),
        }
    }
}

/// Render a number of seconds with its two most significant units,
/// e.g. "58 days 16 hours".
pub fn render_timespan(seconds: i128) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    // Clamp: beyond u64 seconds the years count is meaningless anyway.
    let total = u64::try_from(total).unwrap_or(u64::MAX);

    let years = total / SECONDS_PER_YEAR;
    let days = (total % SECONDS_PER_YEAR) / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;

    let body = if years > 0 {
        format!("{} {}", unit(years, "year"), unit(days, "day"))
    } else if days > 0 {
        format!("{} {}", unit(days, "day"), unit(hours, "hour"))
    } else if hours > 0 {
        format!("{} {}", unit(hours, "hour"), unit(minutes, "minute"))
    } else if minutes > 0 {
        format!("{} {}", unit(minutes, "minute"), unit(secs, "second"))
    } else {
        unit(secs, "second")
    };

    format!("{}{}", sign, body)
}

/// Render a percentage with two decimals, e.g. "10.00%".
pub fn render_percent(value: i64) -> String {
    format!("{:.2}%", value as f64)
}

/// Render a byte count in binary units, e.g. "1.50 GiB".
pub fn render_bytes(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let bytes = value.unsigned_abs();

    if bytes < 1024 {
        return format!("{}{} B", sign, bytes);
    }

    let mut scaled = bytes as f64;
    let mut index = 0;
    while scaled >= 1024.0 && index < BYTE_UNITS.len() - 1 {
        scaled /= 1024.0;
        index += 1;
    }

    format!("{}{:.2} {}", sign, scaled, BYTE_UNITS[index])
}

fn unit(count: u64, name: &str) -> String {
    if count == 1 {
        format!("{} {}", count, name)
    } else {
        format!("{} {}s", count, name)
    }
}
