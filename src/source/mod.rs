//! Telemetry source abstraction.
//!
//! A source yields the tokenized lines of the `smart` agent section. Where
//! those lines come from (an agent dump on disk, a buffer captured by an
//! embedding host) is up to the implementation.

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use std::fmt::Debug;
use std::path::PathBuf;

use smartwatch_adapters::{parse_section, StringTable};
use smartwatch_types::Section;
use thiserror::Error;

/// Errors raised while reading telemetry.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for reading SMART telemetry from various sources.
///
/// # Example
///
/// ```
/// use smartwatch::{MemorySource, TelemetrySource};
///
/// let mut source = MemorySource::new("<<<smart>>>\n/dev/nvme0n1 NVME X\nPercentage Used: 1%\n");
/// let section = source.read_section().unwrap();
/// assert_eq!(section.len(), 1);
/// ```
pub trait TelemetrySource: Debug {
    /// Read the tokenized lines of the `smart` section.
    fn read_table(&mut self) -> Result<StringTable, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Read and parse the current telemetry.
    fn read_section(&mut self) -> Result<Section, SourceError> {
        Ok(parse_section(self.read_table()?))
    }
}
