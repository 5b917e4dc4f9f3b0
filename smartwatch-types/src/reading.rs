//! Device attribute map - the normalized output of the telemetry parser.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::DiskAttribute;

/// Vendor-normalized value and failure threshold of an attribute.
///
/// Tabular sources report these next to the raw value. They are kept for
/// [`DiskAttribute::ReallocatedEvents`] only, where the evaluator trusts the
/// normalized pair over the raw counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct NormalizedPair {
    /// Current normalized value (higher is healthier).
    #[cfg_attr(feature = "minicbor", n(0))]
    pub value: i64,

    /// Value at or below which the vendor considers the attribute failed.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub threshold: i64,
}

impl NormalizedPair {
    /// Create a pair.
    pub const fn new(value: i64, threshold: i64) -> Self {
        Self { value, threshold }
    }

    /// Whether the normalized value has reached the failure threshold.
    pub const fn is_failing(&self) -> bool {
        self.value <= self.threshold
    }
}

/// All attributes read from one device.
///
/// Keys are canonical registry names for recognized attributes and the raw
/// vendor names for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct DiskReading {
    /// Attribute name to integer value.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub attributes: BTreeMap<String, i64>,

    /// Normalized value/threshold of the reallocated events attribute, if
    /// the source reported them.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    #[cfg_attr(feature = "minicbor", n(1))]
    pub reallocated_events_normalized: Option<NormalizedPair>,
}

impl DiskReading {
    /// Create an empty reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a reading.
    pub fn builder() -> DiskReadingBuilder {
        DiskReadingBuilder::new()
    }

    /// Check if no attribute was read.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Value of a registry attribute.
    pub fn value(&self, attribute: DiskAttribute) -> Option<i64> {
        self.get(attribute.name())
    }

    /// Value of any attribute by name.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).copied()
    }

    /// Check if an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.attributes.insert(name.into(), value);
    }

    /// Set an attribute unless it is already present.
    ///
    /// Returns `false` if the attribute existed and was left untouched.
    pub fn set_if_absent(&mut self, name: &str, value: i64) -> bool {
        if self.attributes.contains_key(name) {
            return false;
        }
        self.attributes.insert(String::from(name), value);
        true
    }

    /// Overlay another reading onto this one, attribute by attribute.
    pub fn merge(&mut self, other: DiskReading) {
        self.attributes.extend(other.attributes);
        if other.reallocated_events_normalized.is_some() {
            self.reallocated_events_normalized = other.reallocated_events_normalized;
        }
    }

    /// Iterate over all attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.attributes.iter()
    }
}

/// Device attribute map for one parse run, keyed by device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct Section {
    /// Readings keyed by device identifier (e.g. `/dev/sda`).
    #[cfg_attr(feature = "minicbor", n(0))]
    pub disks: BTreeMap<String, DiskReading>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing sections.
    pub fn builder() -> SectionBuilder {
        SectionBuilder::new()
    }

    /// Check if no device was seen.
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Reading of a specific device.
    pub fn get(&self, device: &str) -> Option<&DiskReading> {
        self.disks.get(device)
    }

    /// Reading of a device, created empty if missing.
    pub fn disk_mut(&mut self, device: &str) -> &mut DiskReading {
        self.disks.entry(String::from(device)).or_default()
    }

    /// Iterate over all devices.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DiskReading)> {
        self.disks.iter()
    }

    /// Merge another section into this one.
    ///
    /// Devices present in both are merged attribute by attribute, with the
    /// values of `other` winning.
    pub fn merge(&mut self, other: Section) {
        for (device, reading) in other.disks {
            match self.disks.get_mut(&device) {
                Some(existing) => existing.merge(reading),
                None => {
                    self.disks.insert(device, reading);
                }
            }
        }
    }
}

impl FromIterator<(String, DiskReading)> for Section {
    fn from_iter<T: IntoIterator<Item = (String, DiskReading)>>(iter: T) -> Self {
        Self {
            disks: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for `Section`.
#[derive(Debug, Default)]
pub struct SectionBuilder {
    disks: BTreeMap<String, DiskReading>,
}

impl SectionBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device with a reading built using a closure.
    pub fn disk<F>(mut self, device: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(DiskReadingBuilder) -> DiskReadingBuilder,
    {
        let reading = f(DiskReadingBuilder::new()).build();
        self.disks.insert(device.into(), reading);
        self
    }

    /// Add a device with a pre-built reading.
    pub fn reading(mut self, device: impl Into<String>, reading: DiskReading) -> Self {
        self.disks.insert(device.into(), reading);
        self
    }

    /// Build the section.
    pub fn build(self) -> Section {
        Section { disks: self.disks }
    }
}

/// Builder for `DiskReading`.
#[derive(Debug, Default)]
pub struct DiskReadingBuilder {
    reading: DiskReading,
}

impl DiskReadingBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a registry attribute.
    pub fn attribute(mut self, attribute: DiskAttribute, value: i64) -> Self {
        self.reading.set(attribute.name(), value);
        self
    }

    /// Set an attribute by raw name.
    pub fn raw(mut self, name: impl Into<String>, value: i64) -> Self {
        self.reading.set(name, value);
        self
    }

    /// Set the normalized reallocated events pair.
    pub fn reallocated_events_normalized(mut self, value: i64, threshold: i64) -> Self {
        self.reading.reallocated_events_normalized = Some(NormalizedPair::new(value, threshold));
        self
    }

    /// Build the reading.
    pub fn build(self) -> DiskReading {
        self.reading
    }
}
