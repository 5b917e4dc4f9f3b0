//! Check cycle reports.

use std::fmt::Write as _;

use serde::Serialize;
use smartwatch_types::{CheckOutcome, Verdict};

use crate::check::{CheckError, ItemCheck};

/// Exit code of a cycle with at least one critical verdict.
pub const EXIT_CRITICAL: u8 = 2;

/// An item that produced no verdict this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingItem {
    pub item: String,
    pub reason: String,
}

/// Results of one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub outcomes: Vec<CheckOutcome>,
    pub pending: Vec<PendingItem>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The worst verdict across all items.
    pub fn verdict(&self) -> Verdict {
        self.outcomes
            .iter()
            .map(CheckOutcome::verdict)
            .max()
            .unwrap_or_default()
    }

    /// Process exit code: [`EXIT_CRITICAL`] if anything is critical.
    pub fn exit_code(&self) -> u8 {
        if self.verdict().is_critical() {
            EXIT_CRITICAL
        } else {
            0
        }
    }

    /// Plain text: a header per item, then `<OK|CRIT> - <summary>` and
    /// `metric <name>=<value>` per attribute.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for outcome in &self.outcomes {
            let _ = writeln!(out, "[{}] {}", outcome.item, outcome.verdict().symbol());
            if outcome.results.is_empty() {
                let _ = writeln!(out, "device not present in current reading");
            }
            for result in &outcome.results {
                let _ = writeln!(out, "{} - {}", result.verdict.symbol(), result.summary);
                let _ = writeln!(out, "metric {}={}", result.metric.name, result.metric.value);
            }
        }

        for pending in &self.pending {
            let _ = writeln!(out, "[{}] PENDING - {}", pending.item, pending.reason);
        }

        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<ItemCheck> for CheckReport {
    fn from_iter<T: IntoIterator<Item = ItemCheck>>(iter: T) -> Self {
        let mut report = Self::new();
        for check in iter {
            match check {
                ItemCheck::Evaluated(outcome) => report.outcomes.push(outcome),
                ItemCheck::Pending(err) => {
                    let reason = match &err {
                        CheckError::Rate { source, .. } => source.to_string(),
                        CheckError::UnknownItem { .. } => {
                            "not among the discovered items".to_string()
                        }
                    };
                    report.pending.push(PendingItem {
                        item: err.item().to_string(),
                        reason,
                    });
                }
            }
        }
        report
    }
}
