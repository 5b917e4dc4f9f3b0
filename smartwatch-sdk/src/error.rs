//! Error types for rate derivation and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// A rate could not be derived from the stored counter.
///
/// In both cases the counter has already been updated with the new
/// observation, so the next evaluation will produce a rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// First observation of this key.
    #[error("counter {0} initialized")]
    Initialized(String),

    /// The observation is not newer than the stored one.
    #[error("no time difference for counter {0}")]
    NoTimeDifference(String),
}

impl RateError {
    /// Key of the counter the error refers to.
    pub fn key(&self) -> &str {
        match self {
            RateError::Initialized(key) | RateError::NoTimeDifference(key) => key,
        }
    }
}

/// Loading or saving persisted state failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode: {0}")]
    Encode(#[from] serde_json::Error),
}
