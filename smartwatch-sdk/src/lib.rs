//! # smartwatch-sdk
//!
//! Persistent counter state for turning monotonically increasing SMART
//! counters into per-second rates across check cycles.
//!
//! ## Quick Start
//!
//! ```rust
//! use smartwatch_sdk::{RateError, RateKey, RateState, RateTracker};
//!
//! let state = RateState::new();
//! let key = RateKey::cmd_timeout("/dev/sda").to_string();
//!
//! // The first observation only initializes the counter
//! assert!(matches!(
//!     state.get_rate(&key, 0.0, 0),
//!     Err(RateError::Initialized(_))
//! ));
//!
//! // Later observations yield counts per second
//! let rate = state.get_rate(&key, 3600.0, 36).unwrap();
//! assert_eq!(rate, 0.01);
//! ```
//!
//! ## Features
//!
//! - **Reset tolerant**: a counter that goes backwards yields a rate of zero
//!   and becomes the new reference
//! - **Thread-safe**: each key is updated under its own lock, so distinct
//!   devices never contend
//! - **Durable**: [`RateState::load`] and [`RateState::save`] persist the
//!   counters as JSON between process runs; [`RateState::open`] holds an
//!   exclusive file lock until [`LockedRateState::commit`], so overlapping
//!   runs sharing one file never lose each other's updates

mod error;
mod key;
mod state;
mod store;

pub use error::{RateError, StoreError};
pub use key::{RateKey, CMD_TIMEOUT_COUNTER, DEFAULT_CHECK};
pub use state::{Counter, RateState, RateTracker};
pub use store::{load_json, save_json, LockedRateState, StateLock};
