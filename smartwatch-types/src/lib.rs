//! # smartwatch-types
//!
//! Core types for disk health telemetry. This crate defines the attribute
//! registry shared by the parser, the discovery engine and the health
//! evaluator, together with the data that flows between them.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` and/or `minicbor` features as needed
//! - **Closed registry**: Every recognized attribute is a [`DiskAttribute`] variant,
//!   known at build time
//! - **Ergonomic builders**: Fluent API for constructing sections in tests and tools
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//! - `minicbor`: Compact binary serialization via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use smartwatch_types::{DiskAttribute, Section};
//!
//! let section = Section::builder()
//!     .disk("/dev/sda", |d| {
//!         d.attribute(DiskAttribute::ReallocatedSectors, 0)
//!          .attribute(DiskAttribute::PowerOnHours, 1408)
//!          .raw("Seek_Error_Rate", 0)
//!     })
//!     .build();
//!
//! let sda = section.get("/dev/sda").unwrap();
//! assert_eq!(sda.value(DiskAttribute::PowerOnHours), Some(1408));
//! assert_eq!(DiskAttribute::PowerOnHours.render(1408), "58 days 16 hours");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod attribute;
mod baseline;
mod reading;
mod render;
mod verdict;

pub use attribute::*;
pub use baseline::*;
pub use reading::*;
pub use render::*;
pub use verdict::*;
