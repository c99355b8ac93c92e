//! Tracing bootstrap for test suites
//!
//! Libraries in this workspace only emit `tracing` events. Test suites that
//! want to see them install a subscriber through [`init_test_tracing`].
//!
//! The filter honours `RUST_LOG` when set and falls back to `debug`.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a test-writer subscriber, ignoring "already installed" errors
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

#[cfg(test)]
mod tests {
    //! Unit tests for observability.
    use super::*;

    /// Validates the repeated initialization scenario.
    ///
    /// Assertions:
    /// - `init_test_tracing` can be called more than once.
    /// - A later global install is rejected because one is already set.
    #[test]
    fn test_repeated_install_is_harmless() {
        init_test_tracing();
        init_test_tracing();

        assert!(fmt().with_test_writer().try_init().is_err());
    }
}
