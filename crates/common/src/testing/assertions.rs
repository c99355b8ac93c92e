//! Custom assertions for testing

// These assertions are designed to panic on failure.
#![allow(clippy::missing_panics_doc, clippy::panic)]

use std::fmt::Debug;

/// Assert that an error's `Display` output contains a substring
///
/// # Examples
///
/// ```
/// let result: Result<(), String> = Err("unsupported cache strategy: MRU".to_string());
/// evictkit_common::assert_error_contains!(result, "MRU");
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that an error classifies with the expected severity
///
/// The error type must implement
/// [`ErrorClassification`](crate::error::ErrorClassification).
#[macro_export]
macro_rules! assert_error_severity {
    ($result:expr, $severity:expr $(,)?) => {{
        use $crate::error::ErrorClassification as _;
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => assert_eq!(e.severity(), $severity, "Unexpected severity for {:?}", e),
        }
    }};
}

/// Assert that `items` are sorted in non-increasing order of `key`
pub fn assert_sorted_desc_by<T, K, F>(items: &[T], key: F)
where
    T: Debug,
    K: Ord,
    F: Fn(&T) -> K,
{
    for window in items.windows(2) {
        assert!(
            key(&window[0]) >= key(&window[1]),
            "Items out of descending order: {:?} before {:?}",
            window[0],
            window[1]
        );
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::assertions.
    use super::*;

    /// Validates `assert_error_contains!` on a matching error.
    #[test]
    fn test_assert_error_contains_passes() {
        let result: Result<(), String> = Err("listener failed: disk full".to_string());
        assert_error_contains!(result, "disk full");
    }

    /// Validates `assert_error_contains!` panics on `Ok`.
    #[test]
    #[should_panic(expected = "Expected error but got Ok")]
    fn test_assert_error_contains_rejects_ok() {
        let result: Result<(), String> = Ok(());
        assert_error_contains!(result, "anything");
    }

    /// Validates `assert_sorted_desc_by` on ordered and unordered input.
    #[test]
    fn test_assert_sorted_desc_by() {
        assert_sorted_desc_by(&[5, 3, 3, 1], |v| *v);
        let outcome = std::panic::catch_unwind(|| assert_sorted_desc_by(&[1, 2], |v| *v));
        assert!(outcome.is_err());
    }
}
