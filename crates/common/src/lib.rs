//! Modular common utilities shared across Evictkit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, time abstraction, serde helpers, macros
//! - `observability`: test tracing subscriber (not included by default)
//! - `test-utils`: assertion helpers for downstream test suites

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod time;
#[cfg(feature = "foundation")]
#[macro_use]
pub mod utils;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
#[cfg(feature = "foundation")]
pub use utils::serde::duration_millis;
