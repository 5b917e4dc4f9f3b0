//! Key/value ("NVMe") lines as printed by `nvme smart-log`.
//!
//! ## Line layout
//!
//! ```text
//! /dev/nvme0n1 NVME SAMSUNG_MZVLB512HAJQ-000L7
//! Critical Warning: 0x00
//! Temperature: 36 Celsius
//! Available Spare: 100%
//! Data Units Read: 1,234,567 [632 GB]
//! ```
//!
//! A line whose first field contains `/dev` starts a new device record. The
//! following lines are `Field: value` pairs; the field becomes the attribute
//! key with spaces replaced by underscores.

use smartwatch_types::Section;
use tracing::debug;

use crate::error::{or_zero, parse_hex, parse_int, ParseError};

/// Vendor block count unit ("data units") in bytes.
pub const DATA_UNIT_BYTES: i64 = 512_000;

/// Accumulates key/value lines into per-device readings.
#[derive(Debug, Default)]
pub struct NvmeParser {
    section: Section,
    current: Option<String>,
}

impl NvmeParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tokenized line.
    pub fn feed<F: AsRef<str>>(&mut self, fields: &[F]) {
        let Some(first) = fields.first().map(|f| f.as_ref()) else {
            return;
        };

        if first.contains("/dev") {
            self.section.disk_mut(first);
            self.current = Some(first.to_string());
            return;
        }

        let Some(device) = self.current.as_deref() else {
            debug!(line = first, "key/value line before any device line");
            return;
        };

        let line = fields.iter().map(|f| f.as_ref()).collect::<Vec<&str>>().join(" ");
        match parse_pair(&line) {
            Ok((key, value)) => self.section.disk_mut(device).set(key, value),
            Err(err) => debug!(device, %err, "dropping key/value line"),
        }
    }

    /// Finish parsing and return the accumulated section.
    pub fn finish(self) -> Section {
        self.section
    }
}

/// Split a `Field: value` line once on its first colon and convert the value.
///
/// Only a missing separator is an error; conversion faults yield zero.
pub fn parse_pair(line: &str) -> Result<(String, i64), ParseError> {
    let (field, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MissingSeparator(line.to_string()))?;

    let field = field.trim();
    let key = field.replace(' ', "_");
    let value: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | '.' | ','))
        .collect();

    let converted = or_zero(convert_value(field, &key, &value));
    Ok((key, converted))
}

fn convert_value(field: &str, key: &str, value: &str) -> Result<i64, ParseError> {
    match field {
        "Temperature" => parse_int(key, first_token(value)),
        "Critical Warning" => parse_hex(key, value),
        "Data Units Read" | "Data Units Written" => {
            parse_int(key, first_token(value)).map(|units| units.saturating_mul(DATA_UNIT_BYTES))
        }
        _ => parse_int(key, value),
    }
}

fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

/// Parse key/value lines. Lines outside 3 to 6 fields are not filtered here;
/// callers are expected to classify first.
pub fn parse_nvme_lines<L, F>(lines: impl IntoIterator<Item = L>) -> Section
where
    L: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut parser = NvmeParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}
