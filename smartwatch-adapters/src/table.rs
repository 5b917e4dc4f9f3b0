//! Line tables and dialect classification.
//!
//! The agent delivers plain text. Lines are split on whitespace into a
//! [`StringTable`]; each row is then classified into a [`Dialect`] purely by
//! its field count.

/// Whitespace-tokenized lines, in input order.
pub type StringTable = Vec<Vec<String>>;

/// Name of the agent section carrying SMART telemetry.
pub const SMART_SECTION: &str = "smart";

/// Minimum field count of a tabular attribute line.
pub const ATA_MIN_FIELDS: usize = 13;

/// Field count range of key/value lines.
pub const NVME_FIELDS: core::ops::RangeInclusive<usize> = 3..=6;

/// Source format of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Fixed-column attribute table (`smartctl -A`).
    Ata,
    /// `Field: value` pairs grouped under a device line (`nvme smart-log`).
    Nvme,
}

impl Dialect {
    /// Classify a tokenized line, `None` for lines neither dialect uses.
    pub fn classify<F: AsRef<str>>(fields: &[F]) -> Option<Self> {
        match fields.len() {
            n if n >= ATA_MIN_FIELDS => Some(Dialect::Ata),
            n if NVME_FIELDS.contains(&n) => Some(Dialect::Nvme),
            _ => None,
        }
    }
}

/// Split every non-empty line of `raw` on whitespace.
pub fn tokenize(raw: &str) -> StringTable {
    raw.lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|fields| !fields.is_empty())
        .collect()
}

/// Extract the lines of one agent section.
///
/// Sections start with a `<<<name>>>` header (optionally `<<<name:options>>>`)
/// and run until the next header. Input without any header is taken to be
/// a single section of the requested kind.
pub fn extract_section(raw: &str, name: &str) -> StringTable {
    if !raw.lines().any(|line| section_header(line).is_some()) {
        return tokenize(raw);
    }

    let mut inside = false;
    let mut table = StringTable::new();

    for line in raw.lines() {
        if let Some(header) = section_header(line) {
            inside = header == name;
            continue;
        }
        if !inside {
            continue;
        }
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if !fields.is_empty() {
            table.push(fields);
        }
    }

    table
}

/// Section name of a header line, `None` for ordinary lines.
fn section_header(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("<<<")?.strip_suffix(">>>")?;
    Some(inner.split(':').next().unwrap_or(inner))
}
