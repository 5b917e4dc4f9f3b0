//! Baseline parameter set - attribute values frozen at discovery time.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::{DiskAttribute, DiskReading};

/// Values of capture-worthy attributes recorded when a device was discovered.
///
/// Created once by discovery and handed back verbatim to every check.
/// The evaluator only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(transparent))]
pub struct Baseline(#[cfg_attr(feature = "minicbor", n(0))] pub BTreeMap<String, i64>);

impl Baseline {
    /// Create an empty baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every attribute of `reading` whose registry entry is flagged
    /// for discovery.
    pub fn capture(reading: &DiskReading) -> Self {
        DiskAttribute::ALL
            .iter()
            .filter(|attribute| attribute.capture_on_discovery())
            .filter_map(|attribute| {
                reading
                    .value(*attribute)
                    .map(|value| (String::from(attribute.name()), value))
            })
            .collect()
    }

    /// Check if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of captured attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Baseline value of a registry attribute.
    pub fn value(&self, attribute: DiskAttribute) -> Option<i64> {
        self.0.get(attribute.name()).copied()
    }

    /// Iterate over all captured values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.0.iter()
    }
}

impl FromIterator<(String, i64)> for Baseline {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
