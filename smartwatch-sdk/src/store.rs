//! JSON persistence of counter state.
//!
//! The file holds one object mapping each key to its last observation:
//!
//! ```json
//! {
//!   "smart_stats./dev/sda.cmd_timeout": { "timestamp": 1700000000.0, "value": 0 }
//! }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;
use crate::state::{Counter, RateState};

/// Read a JSON document, `None` if the file does not exist.
///
/// An unreadable or corrupt file is an error rather than a silent reset.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a JSON document.
///
/// The content goes to a uniquely named temporary file in the same directory
/// and is renamed over `path`, so readers never observe a partially written
/// file and concurrent writers never share a temporary.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(json.as_bytes()).map_err(io_error)?;
    tmp.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}

/// Exclusive hold on a state file.
///
/// Backed by an OS lock on a sibling `<path>.lock` file, so it excludes other
/// processes as well as other handles in this one. Released on drop.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
}

impl StateLock {
    /// Block until the lock for `path` is held.
    pub fn acquire(path: &Path) -> Result<Self, StoreError> {
        let lock_path = lock_path(path);
        let io_error = |source: std::io::Error| StoreError::Io {
            path: lock_path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_error)?;
        file.lock().map_err(io_error)?;

        debug!(path = %lock_path.display(), "state lock acquired");
        Ok(Self { _file: file })
    }
}

/// Counter state loaded under an exclusive [`StateLock`].
///
/// Other processes opening the same file wait until [`commit`] (or drop), so
/// one load-evaluate-save cycle never overwrites another's counters.
///
/// [`commit`]: LockedRateState::commit
#[derive(Debug)]
pub struct LockedRateState {
    state: RateState,
    path: PathBuf,
    _lock: StateLock,
}

impl LockedRateState {
    /// Persist the counters and release the lock.
    pub fn commit(self) -> Result<(), StoreError> {
        self.state.save(&self.path)
    }
}

impl Deref for LockedRateState {
    type Target = RateState;

    fn deref(&self) -> &RateState {
        &self.state
    }
}

impl RateState {
    /// Load counters from a JSON file. A missing file yields empty state.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        match load_json::<BTreeMap<String, Counter>>(path)? {
            Some(counters) => {
                debug!(path = %path.display(), counters = counters.len(), "loaded counters");
                Ok(Self::from_counters(counters))
            }
            None => {
                debug!(path = %path.display(), "no counter file, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Lock `path` and load its counters for one read-modify-write cycle.
    pub fn open(path: impl AsRef<Path>) -> Result<LockedRateState, StoreError> {
        let path = path.as_ref();
        let lock = StateLock::acquire(path)?;
        let state = Self::load(path)?;
        Ok(LockedRateState {
            state,
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    /// Write all counters to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        save_json(path, &self.counters())?;
        debug!(path = %path.display(), "saved counters");
        Ok(())
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
