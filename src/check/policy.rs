//! Per-attribute comparison strategies.

use smartwatch_types::{NormalizedPair, Verdict};

/// Hourly ceiling of command timeouts before the counter is critical.
pub const MAX_COMMAND_TIMEOUTS_PER_HOUR: i64 = 100;

/// [`MAX_COMMAND_TIMEOUTS_PER_HOUR`] in counts per second.
pub const MAX_COMMAND_TIMEOUT_RATE: f64 = MAX_COMMAND_TIMEOUTS_PER_HOUR as f64 / (60.0 * 60.0);

/// Verdict of one attribute plus the hints appended to its summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assessment {
    pub verdict: Verdict,
    pub hints: Vec<String>,
}

impl Assessment {
    /// Nothing to compare against.
    pub fn informational() -> Self {
        Self::default()
    }

    /// Critical when the value grew past its discovery value.
    pub fn exceeds(value: i64, reference: i64) -> Self {
        Self::compared(value > reference, reference)
    }

    /// Critical when the value fell below a threshold.
    pub fn below(value: i64, threshold: i64) -> Self {
        Self::compared(value < threshold, threshold)
    }

    fn compared(critical: bool, reference: i64) -> Self {
        let hints = if critical {
            vec![format!("during discovery: {reference} (!!)")]
        } else {
            Vec::new()
        };
        Self {
            verdict: Verdict::critical_if(critical),
            hints,
        }
    }

    /// Replace the verdict with the normalized pair's. Hints of the raw
    /// comparison are kept.
    pub fn cross_check(mut self, normalized: NormalizedPair) -> Self {
        let failing = normalized.is_failing();
        let mut hint = format!("normalized value: {}", normalized.value);
        if failing {
            hint.push_str(" (!!)");
        }
        self.hints.push(hint);
        self.verdict = Verdict::critical_if(failing);
        self
    }

    /// Judge a counter by its rate instead of its value.
    pub fn rate_limited(rate: f64, discovered: i64) -> Self {
        let critical = rate > MAX_COMMAND_TIMEOUT_RATE;
        let hints = if critical {
            vec![format!(
                "counter increased more than {MAX_COMMAND_TIMEOUTS_PER_HOUR} counts / h (!!). \
                 Value during discovery was: {discovered}"
            )]
        } else {
            Vec::new()
        };
        Self {
            verdict: Verdict::critical_if(critical),
            hints,
        }
    }

    /// `<label>: <value>` with the hints in parentheses, if any.
    pub fn summary(&self, label: &str, rendered: &str) -> String {
        if self.hints.is_empty() {
            format!("{label}: {rendered}")
        } else {
            format!("{label}: {rendered} ({})", self.hints.join(", "))
        }
    }
}
