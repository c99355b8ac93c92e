//! Testing utilities and helpers
//!
//! - **[`assertions`]**: assertion macros and functions for error and
//!   ordering checks
//!
//! Time control lives in [`crate::time::MockClock`].

pub mod assertions;

// Macros exported with #[macro_export] are available at crate root
pub use assertions::assert_sorted_desc_by;
