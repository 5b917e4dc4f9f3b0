//! # smartwatch-adapters
//!
//! Parsers that turn raw SMART telemetry into a normalized
//! [`Section`](smartwatch_types::Section): device identifier to attribute
//! name to integer value.
//!
//! ## Supported Dialects
//!
//! - **Tabular** (`ata` feature) - `smartctl -A` attribute tables, one
//!   attribute per line with at least 13 fields
//! - **Key/value** (`nvme` feature) - `nvme smart-log` output, a device line
//!   followed by `Field: value` lines of 3 to 6 fields
//!
//! Both dialects may be interleaved in one input. Every line is classified by
//! field count and handed to its dialect parser in a single pass; the results
//! are merged by device identifier.
//!
//! ## Quick Start
//!
//! ```rust
//! use smartwatch_adapters::{parse_section, tokenize};
//! use smartwatch_types::DiskAttribute;
//!
//! let raw = "\
//! /dev/sda ATA WDC 5 Reallocated_Sector_Ct 0x0013 100 100 050 Pre-fail Always - 0
//! /dev/nvme0n1 NVME SAMSUNG
//! Available Spare: 100%
//! ";
//!
//! let section = parse_section(tokenize(raw));
//!
//! assert_eq!(section.len(), 2);
//! let nvme = section.get("/dev/nvme0n1").unwrap();
//! assert_eq!(nvme.value(DiskAttribute::AvailableSpare), Some(100));
//! ```
//!
//! ## Fault Tolerance
//!
//! Parsing never fails. A value that can't be converted is stored as zero,
//! so one malformed field cannot destroy the attributes next to it.

pub mod error;
pub mod table;

#[cfg(feature = "ata")]
pub mod ata;

#[cfg(feature = "nvme")]
pub mod nvme;

pub use error::ParseError;
pub use table::{extract_section, tokenize, Dialect, StringTable, SMART_SECTION};

// Re-export types for convenience
pub use smartwatch_types::{DiskAttribute, DiskReading, NormalizedPair, Section};

use tracing::trace;

/// Parse a tokenized line table into a device attribute map.
///
/// Lines matching neither dialect (or a dialect whose feature is disabled)
/// are ignored.
pub fn parse_section<L, F>(table: impl IntoIterator<Item = L>) -> Section
where
    L: AsRef<[F]>,
    F: AsRef<str>,
{
    #[cfg(feature = "ata")]
    let mut ata = ata::AtaParser::new();
    #[cfg(feature = "nvme")]
    let mut nvme = nvme::NvmeParser::new();

    for line in table {
        let fields = line.as_ref();
        match Dialect::classify(fields) {
            #[cfg(feature = "ata")]
            Some(Dialect::Ata) => ata.feed(fields),
            #[cfg(feature = "nvme")]
            Some(Dialect::Nvme) => nvme.feed(fields),
            _ => trace!(fields = fields.len(), "ignoring line"),
        }
    }

    #[allow(unused_mut)]
    let mut section = Section::new();
    #[cfg(feature = "ata")]
    section.merge(ata.finish());
    #[cfg(feature = "nvme")]
    section.merge(nvme.finish());
    section
}

/// Extract the `smart` section from raw agent output and parse it.
pub fn parse_agent_output(raw: &str) -> Section {
    parse_section(extract_section(raw, SMART_SECTION))
}
