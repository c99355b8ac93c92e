//! Common error types and utilities shared by Evictkit crates
//!
//! This module provides the standardized error infrastructure that crate
//! specific errors compose with.
//!
//! # Error Handling Architecture
//!
//! 1. **`CommonError`**: error patterns that appear in more than one crate
//!    (validation, serialization and internal defects)
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity and criticality
//! 3. **`ErrorSeverity` enum**: a unified severity level for logging
//!
//! Crate-specific errors should **compose** with `CommonError` rather than
//! duplicating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum CacheError {
//!     #[error("unsupported cache strategy: {0}")]
//!     UnsupportedStrategy(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Warning** | Degraded but operational | Subscriber failure, unreadable file |
//! | **Error** | Failure requiring attention | Invalid configuration, malformed document |
//! | **Critical** | Integrity at risk | Internal invariant violations |

use std::fmt;

use thiserror::Error;

/// Common error variants that appear across multiple crates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Validation errors
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Serialization or deserialization errors
    #[error("Serialization error ({format}): {message}")]
    Serialization { format: String, message: String },

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CommonError {
    /// Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Serialization error for a named format (e.g. "TOML")
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization { format: format.into(), message: message.into() }
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// Standard interface for classifying errors
///
/// All error types in the workspace implement this so callers can make
/// uniform logging decisions.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::Serialization { .. } => ErrorSeverity::Error,
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Error severity levels for monitoring and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention
    Error,
    /// Critical, integrity at risk
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}
