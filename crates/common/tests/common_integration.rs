//! Integration tests for the foundation tier
//!
//! Exercises the error, time and serde helpers through the public API the
//! cache crate depends on.

#![cfg(feature = "foundation")]

use std::time::Duration;

use evictkit_common::{
    duration_millis, impl_enum_conversions, Clock, CommonError, ErrorClassification,
    ErrorSeverity, MockClock,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Mode {
    Strict,
    Lenient,
}

impl_enum_conversions!(Mode {
    Strict => "STRICT",
    Lenient => "LENIENT",
});

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    mode: Mode,
    #[serde(with = "duration_millis")]
    window: Duration,
}

/// Verifies that a mock clock handed to a consumer and advanced through a
/// clone drives both views of time identically.
#[test]
fn test_mock_clock_drives_shared_consumers() {
    let clock = MockClock::new();
    let consumer_view: Box<dyn Clock> = Box::new(clock.clone());
    let start = consumer_view.now();

    clock.advance(Duration::from_millis(120));
    clock.advance(Duration::from_millis(30));

    assert_eq!(consumer_view.now().duration_since(start), Duration::from_millis(150));
}

/// Verifies generated `FromStr` errors classify as validation failures.
#[test]
fn test_enum_parse_errors_classify_as_validation() {
    let err = "relaxed".parse::<Mode>().unwrap_err();

    assert!(matches!(err, CommonError::Validation { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Error);
    assert!(!err.is_retryable());
    assert_eq!("lenient".parse::<Mode>().unwrap(), Mode::Lenient);
    assert_eq!(Mode::Strict.to_string(), "STRICT");
}

/// Verifies millisecond durations round through JSON inside a larger struct.
#[test]
fn test_settings_json_uses_millis() {
    let settings = Settings { mode: Mode::Strict, window: Duration::from_secs(2) };
    let json = serde_json::to_string(&settings).unwrap();
    assert!(json.contains("\"window\":2000"));

    let parsed: Settings = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, settings);
}
