//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `SMARTWATCH_*` environment variables using `__` as the nesting
//! separator (`SMARTWATCH_STATE__RATE_STATE=/var/lib/smartwatch/counters.json`).
//! Command line flags override individual values on top of that.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use smartwatch_sdk::DEFAULT_CHECK;

/// Default path of the persisted baseline store.
pub const DEFAULT_BASELINES: &str = "smartwatch-baselines.json";

/// Default path of the persisted rate state.
pub const DEFAULT_RATE_STATE: &str = "smartwatch-counters.json";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SMARTWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub state: StateSettings,
    pub check: CheckSettings,
    pub log: LogSettings,
}

/// Where persistent state lives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateSettings {
    pub baselines: PathBuf,
    pub rate_state: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckSettings {
    /// Logical check instance; part of every rate state key.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("state.baselines", DEFAULT_BASELINES)?
            .set_default("state.rate_state", DEFAULT_RATE_STATE)?
            .set_default("check.name", DEFAULT_CHECK)?
            .set_default("log.filter", DEFAULT_LOG_FILTER)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder
            .add_source(env.prefix_separator("_").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state: StateSettings {
                baselines: PathBuf::from(DEFAULT_BASELINES),
                rate_state: PathBuf::from(DEFAULT_RATE_STATE),
            },
            check: CheckSettings {
                name: DEFAULT_CHECK.to_string(),
            },
            log: LogSettings {
                filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}
