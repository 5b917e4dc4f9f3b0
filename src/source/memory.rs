//! In-memory telemetry source.

use smartwatch_adapters::{extract_section, StringTable, SMART_SECTION};

use super::{SourceError, TelemetrySource};

/// A telemetry source over a buffer of raw agent output.
///
/// Useful when the host already holds the agent output, and for testing.
#[derive(Debug, Clone)]
pub struct MemorySource {
    raw: String,
    description: String,
}

impl MemorySource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            description: "memory".to_string(),
        }
    }

    /// Set the description shown for this source.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the buffered output, e.g. with the next poll result.
    pub fn replace(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }
}

impl TelemetrySource for MemorySource {
    fn read_table(&mut self) -> Result<StringTable, SourceError> {
        Ok(extract_section(&self.raw, SMART_SECTION))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
