//! File-based telemetry source.
//!
//! Reads an agent dump from disk on every call.

use std::fs;
use std::path::{Path, PathBuf};

use smartwatch_adapters::{extract_section, StringTable, SMART_SECTION};
use tracing::debug;

use super::{SourceError, TelemetrySource};

/// A telemetry source that reads raw agent output from a file.
///
/// The file may hold several agent sections; only the `smart` section is
/// used. A file without section headers is taken as the `smart` section.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySource for FileSource {
    fn read_table(&mut self) -> Result<StringTable, SourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let table = extract_section(&raw, SMART_SECTION);
        debug!(path = %self.path.display(), lines = table.len(), "read telemetry");
        Ok(table)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
