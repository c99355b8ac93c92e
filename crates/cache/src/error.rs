//! Error types for cache construction and operation
//!
//! A missing key is never an error: lookups return `Option`. Errors come
//! from three places only:
//!
//! - **Configuration**: unknown strategy, non-positive capacity or TTL,
//!   unparsable option files. Surfaced before any cache exists.
//! - **Subscribers**: a [`ListenerError`] returned by a listener is passed
//!   straight back to the caller of the cache operation that triggered it.
//!   The cache mutates first and notifies second, so when a subscriber fails
//!   the mutation (including any eviction) has already happened.
//! - **File I/O**: the file-backed wrapper could not read a file.

use std::error::Error as StdError;
use std::path::PathBuf;

use evictkit_common::{CommonError, ErrorClassification, ErrorSeverity};
use thiserror::Error;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors produced by cache construction, configuration and operation
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested eviction strategy does not exist
    #[error("unsupported cache strategy: {0}")]
    UnsupportedStrategy(String),

    /// A configuration value is missing or out of range
    #[error("invalid cache configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A file could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A subscriber failed while handling a cache event
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// Errors shared with the rest of the workspace, including options
    /// documents that could not be parsed
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CacheError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field, reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl ErrorClassification for CacheError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedStrategy(_) | Self::InvalidConfig { .. } => ErrorSeverity::Error,
            Self::Io { .. } | Self::Listener(_) => ErrorSeverity::Warning,
            Self::Common(e) => e.severity(),
        }
    }
}

/// Error returned by a [`CacheListener`](crate::listener::CacheListener)
///
/// # Examples
///
/// ```
/// use evictkit_cache::ListenerError;
///
/// let err = ListenerError::new("stats sink unavailable");
/// assert_eq!(err.to_string(), "cache listener failed: stats sink unavailable");
/// ```
#[derive(Debug, Error)]
#[error("cache listener failed: {message}")]
pub struct ListenerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ListenerError {
    /// Create an error with a message only
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    /// Create an error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self { message: message.into(), source: Some(source.into()) }
    }

    /// The message the listener reported
    pub fn message(&self) -> &str {
        &self.message
    }
}
