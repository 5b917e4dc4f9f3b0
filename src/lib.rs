//! # smartwatch
//!
//! SMART disk health checks: parse agent telemetry, freeze a per-device
//! baseline at discovery, and evaluate later readings against it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌─────────┐
//! │  source  │───▶│ adapters │───▶│ discovery │───▶│ store   │
//! │ (input)  │    │ (parse)  │    │ (baseline)│    │ (JSON)  │
//! └──────────┘    └────┬─────┘    └───────────┘    └────┬────┘
//!                      │                                │
//!                      ▼                                ▼
//!                 ┌──────────┐    ┌───────────┐    ┌─────────┐
//!                 │  check   │◀───│ rate state│    │ report  │
//!                 │(evaluate)│───▶│   (sdk)   │    │ (text)  │
//!                 └──────────┘    └───────────┘    └─────────┘
//! ```
//!
//! - **[`source`]**: where telemetry comes from ([`TelemetrySource`] trait)
//! - **[`discovery`]**: baseline capture and the persisted [`BaselineStore`]
//! - **[`check`]**: the health [`Evaluator`] and its per-attribute policies
//! - **[`report`]**: text and JSON rendering of a check cycle
//! - **[`config`]**: layered settings for the CLI
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Show what the parser makes of an agent dump
//! smartwatch parse agent-output.txt
//!
//! # Freeze baselines once, then check on every poll
//! smartwatch discover agent-output.txt
//! smartwatch check agent-output.txt
//! ```
//!
//! ### As a library
//!
//! ```
//! use smartwatch::{discover, BaselineStore, Evaluator, MemorySource, TelemetrySource};
//! use smartwatch_sdk::RateState;
//!
//! let mut source = MemorySource::new(
//!     "/dev/sda ATA WDC 5 Reallocated_Sector_Ct 0x0013 100 100 050 Pre-fail Always - 0\n",
//! );
//! let section = source.read_section().unwrap();
//! let store: BaselineStore = discover(&section).into_iter().collect();
//!
//! let rates = RateState::new();
//! let evaluator = Evaluator::new(&rates, 0.0);
//! let outcome = evaluator
//!     .check_item("/dev/sda", store.get("/dev/sda").unwrap(), &section)
//!     .unwrap();
//! assert_eq!(outcome.results[0].summary, "Reallocated sectors: 0");
//! ```

pub mod check;
pub mod config;
pub mod discovery;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use check::{check_all, CheckError, Evaluator, ItemCheck};
pub use config::Settings;
pub use discovery::{discover, BaselineStore, DiscoveredItem};
pub use report::{CheckReport, PendingItem};
pub use source::{FileSource, MemorySource, SourceError, TelemetrySource};
