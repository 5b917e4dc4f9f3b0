//! Tabular ("ATA") attribute lines as printed by `smartctl -A`.
//!
//! ## Line layout
//!
//! ```text
//! /dev/sda ATA WDC_SSC-D0128SC- 5 Reallocated_Sector_Ct 0x0013 100 100 050 Pre-fail Always - 0
//! device   type model           id name                 flag   val worst thresh type update failed raw [raw info...]
//! ```
//!
//! Only attributes with a registry code are stored under their canonical
//! name. Lines for codes without a mapping keep the vendor's textual name,
//! and the first such line per name wins.

use smartwatch_types::{DiskAttribute, NormalizedPair, Section};
use tracing::{debug, trace};

use crate::error::{int_or_zero, parse_int};

/// Textual name vendors print for attributes they don't document.
pub const UNKNOWN_ATTRIBUTE: &str = "Unknown_Attribute";

/// Positional fields of one tabular line that the parser uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtaLine<'a> {
    pub device: &'a str,
    pub code: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    pub threshold: &'a str,
    pub raw_value: &'a str,
}

impl<'a> AtaLine<'a> {
    /// Decompose a tokenized line, `None` if it has fewer than 13 fields.
    pub fn from_fields<F: AsRef<str>>(fields: &'a [F]) -> Option<Self> {
        let [device, _type, _model, code, name, _flag, value, _worst, threshold, _kind, _updated, _when_failed, raw_value, ..] =
            fields
        else {
            return None;
        };

        Some(Self {
            device: device.as_ref(),
            code: code.as_ref(),
            name: name.as_ref(),
            value: value.as_ref(),
            threshold: threshold.as_ref(),
            raw_value: raw_value.as_ref(),
        })
    }

    /// Registry attribute of this line, `None` for unmapped or non-numeric codes.
    pub fn attribute(&self) -> Option<DiskAttribute> {
        let code = self.code.parse::<u32>().ok()?;
        DiskAttribute::from_ata_code(code, self.name)
    }

    /// The normalized value/threshold columns, if both are integers.
    pub fn normalized(&self) -> Option<NormalizedPair> {
        let value = parse_int("normalized value", self.value).ok()?;
        let threshold = parse_int("normalized threshold", self.threshold).ok()?;
        Some(NormalizedPair::new(value, threshold))
    }
}

/// Accumulates tabular lines into per-device readings.
#[derive(Debug, Default)]
pub struct AtaParser {
    section: Section,
}

impl AtaParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tokenized line.
    pub fn feed<F: AsRef<str>>(&mut self, fields: &[F]) {
        let Some(line) = AtaLine::from_fields(fields) else {
            return;
        };

        let disk = self.section.disk_mut(line.device);

        if line.name == UNKNOWN_ATTRIBUTE {
            trace!(device = line.device, code = line.code, "skipping unknown attribute");
            return;
        }

        match line.attribute() {
            Some(attribute) => {
                disk.set(attribute.name(), int_or_zero(attribute.name(), line.raw_value));

                if attribute == DiskAttribute::ReallocatedEvents {
                    disk.reallocated_events_normalized = line.normalized();
                    if disk.reallocated_events_normalized.is_none() {
                        debug!(
                            device = line.device,
                            value = line.value,
                            threshold = line.threshold,
                            "normalized reallocated events not numeric"
                        );
                    }
                }
            }
            None => {
                let value = int_or_zero(line.name, line.raw_value);
                if !disk.set_if_absent(line.name, value) {
                    debug!(
                        device = line.device,
                        code = line.code,
                        name = line.name,
                        "duplicate unmapped attribute, keeping first"
                    );
                }
            }
        }
    }

    /// Finish parsing and return the accumulated section.
    pub fn finish(self) -> Section {
        self.section
    }
}

/// Parse tabular lines. Lines with fewer than 13 fields are ignored.
pub fn parse_ata_lines<L, F>(lines: impl IntoIterator<Item = L>) -> Section
where
    L: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut parser = AtaParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}
