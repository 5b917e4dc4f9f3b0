//! Evaluation results - verdicts, metrics and per-item outcomes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::DiskAttribute;

/// Health verdict for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(index_only))]
pub enum Verdict {
    #[default]
    #[cfg_attr(feature = "minicbor", n(0))]
    Normal,
    #[cfg_attr(feature = "minicbor", n(1))]
    Critical,
}

impl Verdict {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Normal => "OK",
            Verdict::Critical => "CRIT",
        }
    }

    /// Critical if `condition` holds, normal otherwise.
    pub fn critical_if(condition: bool) -> Self {
        if condition {
            Verdict::Critical
        } else {
            Verdict::Normal
        }
    }

    /// Check if this verdict is critical.
    pub fn is_critical(&self) -> bool {
        matches!(self, Verdict::Critical)
    }
}

/// A named numeric sample for the host's time-series path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct Metric {
    #[cfg_attr(feature = "minicbor", n(0))]
    pub name: String,
    #[cfg_attr(feature = "minicbor", n(1))]
    pub value: i64,
}

impl Metric {
    /// Create a metric.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Evaluation of one attribute: verdict, display text and metric.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeResult {
    pub attribute: DiskAttribute,
    pub verdict: Verdict,
    pub summary: String,
    pub metric: Metric,
}

/// All attribute results of one monitored item (device).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckOutcome {
    /// Monitored item, i.e. the device identifier.
    pub item: String,
    /// Results in registry order.
    pub results: Vec<AttributeResult>,
}

impl CheckOutcome {
    /// Create an outcome without results.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            results: Vec::new(),
        }
    }

    /// The worst verdict across all results.
    pub fn verdict(&self) -> Verdict {
        self.results
            .iter()
            .map(|r| r.verdict)
            .max()
            .unwrap_or_default()
    }

    /// Result for a specific attribute.
    pub fn get(&self, attribute: DiskAttribute) -> Option<&AttributeResult> {
        self.results.iter().find(|r| r.attribute == attribute)
    }

    /// Iterate over the critical results only.
    pub fn critical(&self) -> impl Iterator<Item = &AttributeResult> {
        self.results.iter().filter(|r| r.verdict.is_critical())
    }
}
